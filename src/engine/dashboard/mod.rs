pub mod refresher;

pub use refresher::DashboardRefresher;
