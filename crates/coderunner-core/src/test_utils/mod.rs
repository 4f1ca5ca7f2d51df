//! In-process stand-ins for the container runtime and the exec sessions.

mod fake_runtime;
mod shell_backend;

pub use fake_runtime::FakeRuntime;
pub use shell_backend::ShellBackend;
