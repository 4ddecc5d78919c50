// Server module entry
// Listener setup, per-connection serving and the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_reusable_listener;
pub use server_loop::run_server;
pub use signal::{start_signal_handler, SignalHandler};
