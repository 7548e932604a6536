use crate::server::PortAllocator;

use std::net::TcpListener;

#[test]
fn given_free_system_when_allocate_then_port_is_bindable() {
    let port = PortAllocator::allocate().unwrap();

    assert_ne!(port, 0);
    assert!(PortAllocator::is_available(port));
}

#[test]
fn given_bound_port_when_checked_then_not_available() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
    let port = listener.local_addr().unwrap().port();

    assert!(!PortAllocator::is_available(port));
}
