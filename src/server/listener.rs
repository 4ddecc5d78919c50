// Listener module
// Binds the public socket through socket2 so address reuse can be set before bind

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

const LISTEN_BACKLOG: i32 = 128;

/// Bind a non-blocking `TcpListener` with `SO_REUSEADDR` (and `SO_REUSEPORT` on Unix)
///
/// Lets the server come straight back up on the same port after a restart
/// while old sockets sit in `TIME_WAIT`.
pub fn create_reusable_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    TcpListener::from_std(socket.into())
}
