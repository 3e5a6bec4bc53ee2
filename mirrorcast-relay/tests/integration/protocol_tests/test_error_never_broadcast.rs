use mirrorcast_core::SignalMessage;
use mirrorcast_relay::RelayService;

use crate::integration::init_tracing;
use crate::utils::{FakeConn, join_room};

#[tokio::test]
async fn test_error_never_broadcast() {
    init_tracing();

    let service = RelayService::new();
    let mut a = FakeConn::connect(&service);
    let mut b = FakeConn::connect(&service);

    join_room(&service, &mut a, "r1");
    join_room(&service, &mut b, "r1");

    service.handle_frame(a.id, "garbage");
    service.handle_frame(a.id, r#"{"type":"nonsense"}"#);

    // A gets its error replies; B must see none of it.
    assert!(matches!(a.try_recv(), Some(SignalMessage::Error { .. })));
    assert!(matches!(a.try_recv(), Some(SignalMessage::Error { .. })));
    b.assert_silent();
}
