pub mod errors;
pub mod db;
pub mod user;
pub mod provider;
pub mod service_offering;
pub mod subscription;
pub mod revoked_token;
pub mod work_post;
pub mod review;
