mod middleware;

pub use middleware::auth_middleware;
