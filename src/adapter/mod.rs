mod axum_adapter;

pub use self::axum_adapter::serve;
