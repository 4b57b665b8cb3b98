//! State of the single screen: the feelings logged today and whether the feeling picker is open.
//! The state only changes through [TodayView::reduce].

use crate::{
    feelings::{entities::FeelingRecord, Feeling},
    utils::time::format_time_of_day,
};

/// Visibility of the feeling picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Hidden,
    Visible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Today's records were read from storage.
    Loaded(Vec<FeelingRecord>),
    /// User asked to record a feeling.
    OpenDialog,
    /// User closed the picker without choosing.
    Cancel,
    /// A picked feeling was stored.
    Appended(FeelingRecord),
    /// A picked feeling could not be stored. The picker stays open.
    AppendFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodayView {
    records: Vec<FeelingRecord>,
    dialog: DialogState,
}

/// One line of the today list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub time: String,
    pub feeling: Feeling,
}

impl TodayView {
    pub fn reduce(self, action: ViewAction) -> TodayView {
        let TodayView {
            mut records,
            dialog,
        } = self;
        match (dialog, action) {
            (_, ViewAction::Loaded(loaded)) => TodayView {
                records: loaded,
                dialog,
            },
            (DialogState::Hidden, ViewAction::OpenDialog) => TodayView {
                records,
                dialog: DialogState::Visible,
            },
            (DialogState::Visible, ViewAction::Cancel) => TodayView {
                records,
                dialog: DialogState::Hidden,
            },
            (DialogState::Visible, ViewAction::Appended(record)) => {
                records.push(record);
                TodayView {
                    records,
                    dialog: DialogState::Hidden,
                }
            }
            // Anything else doesn't change the screen.
            (dialog, _) => TodayView { records, dialog },
        }
    }

    pub fn dialog(&self) -> DialogState {
        self.dialog
    }

    /// Records in the order they were logged.
    pub fn records(&self) -> &[FeelingRecord] {
        &self.records
    }

    /// Records most recent first. Records with equal timestamps keep the later logged one first.
    pub fn display_order(&self) -> Vec<&FeelingRecord> {
        let mut sorted = self.records.iter().rev().collect::<Vec<_>>();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted
    }

    pub fn rows(&self) -> Vec<DisplayRow> {
        self.display_order()
            .into_iter()
            .map(|v| DisplayRow {
                time: format_time_of_day(v.timestamp),
                feeling: v.feeling,
            })
            .collect()
    }

    /// Labels offered by the picker, numbered from 1.
    pub fn palette() -> impl Iterator<Item = (usize, Feeling)> {
        Feeling::ALL.into_iter().enumerate().map(|(i, v)| (i + 1, v))
    }
}
