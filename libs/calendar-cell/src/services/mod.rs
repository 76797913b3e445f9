pub mod grid;
pub mod schedule;
pub mod status;
pub mod view;

pub use grid::{appointments_on, build_grid, build_month_grid, date_key};
pub use schedule::ScheduleService;
pub use status::{aggregate, aggregate_statuses};
pub use view::{CalendarView, FetchTicket};
