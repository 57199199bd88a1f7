//! Status/progress/log hub between the discovery engine and any presentation.
//!
//! Delivery is synchronous, in registration order, to the subscribers present
//! at the time of the notification. Nothing is buffered or replayed.

use std::cell::RefCell;
use std::rc::Rc;

use exporter_logging::{exporter_debug, exporter_info};

/// The three outbound event types the core exposes.
pub trait Notifier {
    fn notify_status(&self, text: &str);
    fn notify_progress(&self, fraction: f64);
    fn notify_log(&self, line: &str);
}

type TextListener = Rc<dyn Fn(&str)>;
type ProgressListener = Rc<dyn Fn(f64)>;

#[derive(Default)]
pub struct NotificationChannel {
    status: RefCell<Vec<TextListener>>,
    progress: RefCell<Vec<ProgressListener>>,
    log: RefCell<Vec<TextListener>>,
}

impl NotificationChannel {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn on_status(&self, listener: impl Fn(&str) + 'static) {
        self.status.borrow_mut().push(Rc::new(listener));
    }

    pub fn on_progress(&self, listener: impl Fn(f64) + 'static) {
        self.progress.borrow_mut().push(Rc::new(listener));
    }

    pub fn on_log(&self, listener: impl Fn(&str) + 'static) {
        self.log.borrow_mut().push(Rc::new(listener));
    }
}

// Listeners may subscribe from inside a callback, so deliver from a copy.
fn current<T: ?Sized>(listeners: &RefCell<Vec<Rc<T>>>) -> Vec<Rc<T>> {
    listeners.borrow().clone()
}

impl Notifier for NotificationChannel {
    fn notify_status(&self, text: &str) {
        exporter_info!("Status update: {}", text);
        for listener in current(&self.status) {
            listener(text);
        }
    }

    fn notify_progress(&self, fraction: f64) {
        for listener in current(&self.progress) {
            listener(fraction);
        }
    }

    fn notify_log(&self, line: &str) {
        exporter_debug!("{}", line);
        for listener in current(&self.log) {
            listener(line);
        }
    }
}
