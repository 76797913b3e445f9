use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::models::{Appointment, CalendarMonth, MonthGrid};
use crate::services::grid::build_month_grid;

/// Identifies one fetch started by [`CalendarView::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    month: CalendarMonth,
}

impl FetchTicket {
    pub fn month(&self) -> CalendarMonth {
        self.month
    }
}

/// The month grid currently shown by one calendar screen.
///
/// Every month change starts a new generation. A fetch result is stored
/// only if no newer fetch has started since, so a slow response for a month
/// the user already left never overwrites the month they are looking at.
#[derive(Debug, Default)]
pub struct CalendarView {
    generation: AtomicU64,
    current: RwLock<Option<MonthGrid>>,
}

impl CalendarView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, month: CalendarMonth) -> FetchTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Calendar fetch {} started for {}", generation, month);
        FetchTicket { generation, month }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Stores `grid` unless `ticket` has been superseded. Returns whether
    /// the grid was stored.
    pub async fn apply(&self, ticket: FetchTicket, grid: MonthGrid) -> bool {
        let mut current = self.current.write().await;
        if !self.is_current(&ticket) {
            warn!(
                "Discarding stale calendar result for {} (fetch {})",
                ticket.month, ticket.generation
            );
            return false;
        }
        *current = Some(grid);
        true
    }

    /// Fetches `month` with `fetch` and shows the resulting grid. `Ok(None)`
    /// means a newer fetch started meanwhile and this result was dropped.
    pub async fn load<F, Fut, E>(&self, month: CalendarMonth, fetch: F) -> Result<Option<MonthGrid>, E>
    where
        F: FnOnce(CalendarMonth) -> Fut,
        Fut: Future<Output = Result<Vec<Appointment>, E>>,
    {
        let ticket = self.begin(month);
        let appointments = fetch(month).await?;
        let grid = build_month_grid(month, &appointments);

        if self.apply(ticket, grid.clone()).await {
            Ok(Some(grid))
        } else {
            Ok(None)
        }
    }

    pub async fn current(&self) -> Option<MonthGrid> {
        self.current.read().await.clone()
    }
}
