//! Transient notifications stacked in the top-right corner.

use gloo_timers::callback::Timeout;
use web_sys::{Document, Element};

use crate::session::{Notice, Notifier};

pub struct Toasts {
    doc: Document,
    container: Element,
}

impl Toasts {
    pub fn new(doc: Document, container: Element) -> Self {
        Self { doc, container }
    }
}

impl Notifier for Toasts {
    fn notify(&self, notice: Notice) {
        let Ok(el) = self.doc.create_element("div") else {
            return;
        };
        el.set_attribute(
            "style",
            "min-width:220px; padding:10px 14px; background:rgba(10,14,30,0.92); border:1px solid rgba(0,255,255,0.35); border-radius:10px; color:#e0ffff; font-size:13px;",
        )
        .ok();
        let Ok(title) = self.doc.create_element("strong") else {
            return;
        };
        title.set_text_content(Some(&notice.title));
        let Ok(body) = self.doc.create_element("div") else {
            return;
        };
        body.set_text_content(Some(&notice.body));
        el.append_child(&title).ok();
        el.append_child(&body).ok();
        if self.container.append_child(&el).is_err() {
            return;
        }
        Timeout::new(notice.duration_ms, move || el.remove()).forget();
    }
}
