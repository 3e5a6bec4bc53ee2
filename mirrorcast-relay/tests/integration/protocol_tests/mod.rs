mod test_error_never_broadcast;
