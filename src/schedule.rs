//! A specialist's daily appointment list.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::context::AppContext;
use crate::db::repository;
use crate::load::{spawn_load, LoadSlot, LoadState};
use crate::models::{search_prefix, AppointmentRequest, ScheduleFilter, Stored};

pub const EMPTY_SCHEDULE_MESSAGE: &str = "No more appointments today.";

pub struct SpecialistScheduleScreen {
    ctx: AppContext,
    filter: ScheduleFilter,
    slot: Arc<LoadSlot<Stored<AppointmentRequest>>>,
}

impl SpecialistScheduleScreen {
    /// Schedule for `specialist` (matched against the appointment's doctor),
    /// starting on today's date.
    pub fn new(ctx: AppContext, specialist: impl Into<String>) -> Self {
        Self::for_date(ctx, specialist, Local::now().date_naive())
    }

    pub fn for_date(ctx: AppContext, specialist: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            ctx,
            filter: ScheduleFilter {
                doctor: specialist.into(),
                date,
                patient_prefix: None,
            },
            slot: Arc::new(LoadSlot::new()),
        }
    }

    pub fn filter(&self) -> &ScheduleFilter {
        &self.filter
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.filter.date = date;
    }

    pub fn set_search(&mut self, text: &str) {
        self.filter.patient_prefix = search_prefix(text);
    }

    pub async fn reload(&self) -> bool {
        let store = Arc::clone(&self.ctx.store);
        let filter = self.filter.clone();
        spawn_load(Arc::clone(&self.slot), move || {
            repository::list_for_specialist(store.as_ref(), &filter).map_err(|e| e.to_string())
        })
        .await
    }

    pub fn appointments(&self) -> Vec<Stored<AppointmentRequest>> {
        self.slot.items()
    }

    pub fn state(&self) -> LoadState<Stored<AppointmentRequest>> {
        self.slot.snapshot()
    }

    /// Placeholder line when the loaded day is empty.
    pub fn empty_message(&self) -> Option<&'static str> {
        let state = self.slot.snapshot();
        (state.applied_seq > 0 && state.items.is_empty()).then_some(EMPTY_SCHEDULE_MESSAGE)
    }
}
