//! Content-pane scrolling. The pane owns at most one scroll handler; rendering
//! a section swaps the handler out instead of stacking another one.

use std::fmt;

const STICKY_HEADER_AT: u8 = 35;

/// Visual state derived from the scroll offset of the content pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEffect {
    pub scroll_top: u16,
    /// 100 while the cover is fully visible, 0 once it has scrolled away.
    pub cover_opacity: u8,
    /// Opacity of the top bar background.
    pub header_opacity: u8,
    /// The track table header sticks below the top bar.
    pub sticky_header: bool,
}

impl Default for ScrollEffect {
    fn default() -> Self {
        Self {
            scroll_top: 0,
            cover_opacity: 100,
            header_opacity: 0,
            sticky_header: false,
        }
    }
}

impl ScrollEffect {
    pub fn compute(scroll_top: u16, cover_height: u16, header_height: u16, has_table: bool) -> Self {
        let cover_opacity = 100 - scrolled_percent(scroll_top, cover_height);
        Self {
            scroll_top,
            cover_opacity,
            header_opacity: scrolled_percent(scroll_top, header_height),
            sticky_header: has_table && cover_opacity <= STICKY_HEADER_AT,
        }
    }
}

fn scrolled_percent(scroll_top: u16, height: u16) -> u8 {
    if scroll_top >= height {
        100
    } else {
        (u32::from(scroll_top) * 100 / u32::from(height)) as u8
    }
}

pub type ScrollHandler = Box<dyn Fn(u16) -> ScrollEffect + Send + Sync>;

#[derive(Default)]
pub struct ContentPane {
    scroll_top: u16,
    handler: Option<ScrollHandler>,
    effect: ScrollEffect,
}

impl ContentPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detaches the current handler, attaches `handler` and resets the offset.
    pub fn replace_scroll_handler(&mut self, handler: ScrollHandler) -> ScrollEffect {
        self.handler.take();
        self.scroll_top = 0;
        self.effect = handler(0);
        self.handler = Some(handler);
        self.effect
    }

    pub fn clear(&mut self) {
        self.handler = None;
        self.scroll_top = 0;
        self.effect = ScrollEffect::default();
    }

    pub fn handler_count(&self) -> usize {
        usize::from(self.handler.is_some())
    }

    /// Moves the offset by `delta` rows within `0..=max` and runs the handler.
    pub fn scroll_by(&mut self, delta: i32, max: u16) -> ScrollEffect {
        let next = (i32::from(self.scroll_top) + delta).clamp(0, i32::from(max));
        self.scroll_top = next as u16;
        if let Some(handler) = &self.handler {
            self.effect = handler(self.scroll_top);
        }
        self.effect
    }

    pub fn scroll_top(&self) -> u16 {
        self.scroll_top
    }

    pub fn effect(&self) -> ScrollEffect {
        self.effect
    }
}

impl fmt::Debug for ContentPane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentPane")
            .field("scroll_top", &self.scroll_top)
            .field("handlers", &self.handler_count())
            .field("effect", &self.effect)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[test]
    fn cover_fades_linearly_and_header_sticks_at_threshold() {
        let effect = ScrollEffect::compute(0, 10, 3, true);
        assert_eq!((effect.cover_opacity, effect.header_opacity), (100, 0));
        assert!(!effect.sticky_header);

        let effect = ScrollEffect::compute(5, 10, 3, true);
        assert_eq!(effect.cover_opacity, 50);
        assert_eq!(effect.header_opacity, 100);
        assert!(!effect.sticky_header);

        let effect = ScrollEffect::compute(7, 10, 3, true);
        assert_eq!(effect.cover_opacity, 30);
        assert!(effect.sticky_header);

        let effect = ScrollEffect::compute(40, 10, 3, true);
        assert_eq!(effect.cover_opacity, 0);
    }

    #[test]
    fn dashboard_never_sticks() {
        assert!(!ScrollEffect::compute(40, 10, 3, false).sticky_header);
        assert_eq!(ScrollEffect::compute(1, 0, 0, false).cover_opacity, 0);
    }

    #[test]
    fn only_the_latest_handler_runs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut pane = ContentPane::new();

        for _ in 0..5 {
            let calls = calls.clone();
            pane.replace_scroll_handler(Box::new(move |top| {
                calls.fetch_add(1, Ordering::SeqCst);
                ScrollEffect::compute(top, 10, 3, true)
            }));
        }
        assert_eq!(pane.handler_count(), 1);

        calls.store(0, Ordering::SeqCst);
        pane.scroll_by(3, 20);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn scroll_offset_is_clamped() {
        let mut pane = ContentPane::new();
        pane.replace_scroll_handler(Box::new(|top| ScrollEffect::compute(top, 10, 3, false)));

        assert_eq!(pane.scroll_by(-4, 20).scroll_top, 0);
        assert_eq!(pane.scroll_by(50, 20).scroll_top, 20);

        pane.replace_scroll_handler(Box::new(|top| ScrollEffect::compute(top, 10, 3, false)));
        assert_eq!(pane.scroll_top(), 0);
    }
}
