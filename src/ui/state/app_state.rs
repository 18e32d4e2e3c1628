use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::admin::AdminEntity;
use crate::domain::entities::record::RowKey;

pub struct AppState {
    pub entity: Signal<AdminEntity>,
    pub search: Signal<String>,
    pub open_row: Signal<Option<RowKey>>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            entity: use_signal(|| AdminEntity::Developers),
            search: use_signal(String::new),
            open_row: use_signal(|| None::<RowKey>),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
        }
    }
}
