mod backend;
pub use backend::{FakeBackend, HttpBackend, ProviderBackend, ProviderRequest, ProviderResponse};

mod mumbler;
pub use mumbler::{MumblerAdapter, MumblerConfig, DEFAULT_MUMBLER_URL};

mod scripted;
pub use scripted::ScriptedHoroscopeProvider;

mod retry;
pub use retry::{RetryHoroscopeProvider, RetryPolicy};
