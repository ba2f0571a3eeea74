// Server module entry point
// Listener setup, connection handling, the accept loop and shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module gets another name
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::bind_listener;
pub use server_loop::serve;
pub use signal::start_signal_handler;
