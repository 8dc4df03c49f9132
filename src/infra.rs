pub mod config;
pub mod docker_adapter;
pub mod environment;
pub mod python_adapter;
pub mod ragflow;
pub mod uv_adapter;

pub use config::Settings;
pub use docker_adapter::DockerAdapter;
pub use environment::ServiceEnv;
pub use python_adapter::PythonInterpreter;
pub use ragflow::RagflowClient;
pub use uv_adapter::UvAdapter;
