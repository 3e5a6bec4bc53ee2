use mirrorcast_core::RoomKey;
use mirrorcast_relay::RelayService;

use crate::integration::init_tracing;
use crate::utils::{FakeConn, join_room};

#[tokio::test]
async fn test_empty_room_destroyed() {
    init_tracing();

    let service = RelayService::new();
    let mut a = FakeConn::connect(&service);
    let mut b = FakeConn::connect(&service);

    join_room(&service, &mut a, "r1");
    join_room(&service, &mut b, "r1");

    let room = RoomKey::from("r1");

    service.disconnect(b.id);
    assert_eq!(service.registry().room_size(&room), Some(1));

    service.disconnect(a.id);
    assert!(!service.registry().contains_room(&room));
    assert_eq!(service.registry().connection_count(), 0);

    // Cleanup must be idempotent: a second disconnect for the same
    // connection is a no-op.
    service.disconnect(a.id);
    assert!(!service.registry().contains_room(&room));
}
