use crossbeam_channel::{unbounded, Receiver, Sender};
use diskmap_core::{DataSource, LoadMsg, Loader};

use crate::view::TreemapView;

pub struct AppState {
    pub source: DataSource,
    pub load_rx: Option<Receiver<LoadMsg>>,
    pub view: Option<TreemapView>,
}

impl AppState {
    pub fn new(source: DataSource) -> Self {
        let mut state = Self {
            source,
            load_rx: None,
            view: None,
        };
        state.start_load();
        state
    }

    pub fn start_load(&mut self) {
        let (tx, rx): (Sender<LoadMsg>, Receiver<LoadMsg>) = unbounded();
        self.load_rx = Some(rx);
        let source = self.source.clone();

        std::thread::spawn(move || {
            Loader::new(source).load(tx);
        });
    }
}
