//! The per-day aggregates that power the dashboard history charts.

mod core;

pub use core::{
    DailyTotals, History, HistorySeries, MonthlyTotals, TimeFrame, add_to_history,
    create_history_table, history_periods, monthly_history, remove_from_history, yearly_history,
};
