//! Calendar sub-client: runs fetch tickets against the klines endpoint.

use crate::client::DashboardClient;
use crate::domain::calendar::{CalendarViewModel, FetchTicket};
use crate::domain::kline::RawCandle;
use crate::error::DashboardError;

/// Sub-client for calendar data loading.
pub struct Calendar<'a> {
    pub(crate) client: &'a DashboardClient,
}

impl<'a> Calendar<'a> {
    /// Fetch the candles a ticket asks for. Does not touch any view-model.
    pub async fn fetch(&self, ticket: &FetchTicket) -> Result<Vec<RawCandle>, DashboardError> {
        self.client.klines().daily(&ticket.symbol, ticket.range).await
    }

    /// Issue a ticket on `vm`, fetch it and apply the outcome.
    ///
    /// Returns the error (if any) after it has been recorded on `vm`.
    pub async fn refresh(&self, vm: &mut CalendarViewModel) -> Result<(), DashboardError> {
        let ticket = vm.begin_fetch();
        self.run(vm, ticket).await
    }

    /// Run a ticket previously returned by a view-model trigger.
    pub async fn run(
        &self,
        vm: &mut CalendarViewModel,
        ticket: FetchTicket,
    ) -> Result<(), DashboardError> {
        match self.fetch(&ticket).await {
            Ok(candles) => {
                vm.complete::<DashboardError>(&ticket, Ok(candles));
                Ok(())
            }
            Err(e) => {
                vm.complete(&ticket, Err(&e));
                Err(e)
            }
        }
    }
}
