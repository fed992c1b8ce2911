pub mod poller;

pub use poller::DashboardPoller;
