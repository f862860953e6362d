use std::collections::HashMap;
use std::ptr;

use chrono::{DateTime, Utc};

use crate::catalog::SeatTable;
use crate::engine::{filter_subjects, rank_schedule, Countdown, CountdownTimer};
use crate::models::{AdmissionScheduleItem, Subject};
use crate::preferences::PreferenceSet;

/// Ranked admission schedule plus one countdown timer per displayed row.
pub(crate) struct ScheduleScreen {
    /// Visible items in catalog order.
    pub(crate) items: Vec<AdmissionScheduleItem>,
    /// Indices into `items` in display order.
    pub(crate) order: Vec<usize>,
    pub(crate) selected: usize,
    timers: HashMap<String, CountdownTimer>,
}

impl ScheduleScreen {
    pub(crate) fn new(
        items: Vec<AdmissionScheduleItem>,
        favorites: &PreferenceSet,
        now: DateTime<Utc>,
    ) -> Self {
        let mut screen = Self {
            items,
            order: Vec::new(),
            selected: 0,
            timers: HashMap::new(),
        };
        screen.rerank(favorites, now);
        screen
    }

    /// Recompute the display order and keep the cursor on the same item.
    pub(crate) fn rerank(&mut self, favorites: &PreferenceSet, now: DateTime<Utc>) {
        let selected_id = self.current_item().map(|item| item.id.clone());

        let order: Vec<usize> = rank_schedule(&self.items, |id| favorites.contains(id), now)
            .into_iter()
            .filter_map(|ranked| self.items.iter().position(|item| ptr::eq(item, ranked)))
            .collect();
        self.order = order;

        if let Some(id) = selected_id {
            if let Some(row) = self.order.iter().position(|&idx| self.items[idx].id == id) {
                self.selected = row;
            }
        }
        self.ensure_in_bounds();
        self.sync_timers(now);
    }

    /// Start timers for rows that appeared and drop the ones whose row is
    /// gone.
    fn sync_timers(&mut self, now: DateTime<Utc>) {
        let items = &self.items;
        let displayed: Vec<&AdmissionScheduleItem> =
            self.order.iter().map(|&idx| &items[idx]).collect();

        self.timers
            .retain(|id, _| displayed.iter().any(|item| &item.id == id));
        for item in displayed {
            self.timers
                .entry(item.id.clone())
                .or_insert_with(|| CountdownTimer::start(item.countdown_date(), now));
        }
    }

    /// Advance every running timer. Returns whether any countdown changed.
    pub(crate) fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for timer in self.timers.values_mut() {
            changed |= timer.tick(now);
        }
        changed
    }

    #[cfg(test)]
    pub(crate) fn running_timers(&self) -> usize {
        self.timers.values().filter(|timer| timer.is_running()).count()
    }

    pub(crate) fn countdown_for(&self, id: &str) -> Countdown {
        self.timers
            .get(id)
            .map(CountdownTimer::current)
            .unwrap_or_else(Countdown::completed)
    }

    /// Items in display order.
    pub(crate) fn rows(&self) -> impl Iterator<Item = &AdmissionScheduleItem> {
        self.order.iter().map(|&idx| &self.items[idx])
    }

    pub(crate) fn current_item(&self) -> Option<&AdmissionScheduleItem> {
        self.order
            .get(self.selected)
            .and_then(|&idx| self.items.get(idx))
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = shift(self.selected, offset, self.order.len());
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.order.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.selected >= self.order.len() {
            self.selected = self.order.len().saturating_sub(1);
        }
    }
}

/// State behind the seat-info screen.
pub(crate) enum SeatScreen {
    NoData { message: String },
    Table(SubjectTable),
}

impl SeatScreen {
    pub(crate) fn from_lookup(lookup: SeatTable<'_>) -> Self {
        match lookup {
            SeatTable::NoData { institution_id } => SeatScreen::NoData {
                message: SeatTable::no_data_message(&institution_id),
            },
            SeatTable::Subjects {
                institution,
                subjects,
            } => SeatScreen::Table(SubjectTable::new(
                institution.name.clone(),
                subjects.to_vec(),
            )),
        }
    }
}

/// Searchable subject list for one institution unit.
pub(crate) struct SubjectTable {
    pub(crate) institution_name: String,
    pub(crate) subjects: Vec<Subject>,
    /// Indices into `subjects` that match the current query.
    pub(crate) filtered: Vec<usize>,
    pub(crate) query: String,
    pub(crate) selected: usize,
}

impl SubjectTable {
    pub(crate) fn new(institution_name: String, subjects: Vec<Subject>) -> Self {
        let mut table = Self {
            institution_name,
            subjects,
            filtered: Vec::new(),
            query: String::new(),
            selected: 0,
        };
        table.apply_filter();
        table
    }

    pub(crate) fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        let filtered: Vec<usize> = filter_subjects(&self.subjects, &self.query)
            .into_iter()
            .filter_map(|hit| self.subjects.iter().position(|s| ptr::eq(s, hit)))
            .collect();
        self.filtered = filtered;

        if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len().saturating_sub(1);
        }
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &Subject> {
        self.filtered.iter().map(|&idx| &self.subjects[idx])
    }

    pub(crate) fn current_subject(&self) -> Option<&Subject> {
        self.filtered.get(self.selected).map(|&idx| &self.subjects[idx])
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = shift(self.selected, offset, self.filtered.len());
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.filtered.len().saturating_sub(1);
    }
}

/// Move a cursor by `offset`, clamped to `0..len`.
fn shift(current: usize, offset: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let target = current as isize + offset;
    target.clamp(0, len as isize - 1) as usize
}
