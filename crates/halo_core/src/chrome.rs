//! Page chrome decisions
//!
//! Pure helpers behind the navbar, navigation links, fade-in reveals and
//! project cards. The host reads scroll offsets and element geometry and
//! applies the returned styles; nothing here touches a document.

/// Sections count as reached this many pixels before their top edge.
pub const ACTIVE_SECTION_LEAD: f32 = 200.0;

/// The reveal viewport ends this many pixels above the real bottom edge.
pub const REVEAL_BOTTOM_MARGIN: f32 = 50.0;
/// Hidden elements sit this far below their resting place.
pub const REVEAL_OFFSET_PX: f32 = 20.0;
pub const REVEAL_TRANSITION_SECS: f32 = 0.6;

pub const NAVBAR_SHADOW: &str = "0 2px 10px rgba(0, 0, 0, 0.3)";
pub const CARD_BACKGROUND: &str = "var(--color-bg-tertiary)";
pub const CARD_HOVER_BACKGROUND: &str =
    "linear-gradient(135deg, rgba(42, 42, 42, 1) 0%, rgba(157, 78, 221, 0.1) 100%)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarStyle {
    /// At the very top of the page.
    Flat,
    /// Scrolled; the bar casts a shadow.
    Elevated,
}

impl NavbarStyle {
    pub fn box_shadow(self) -> &'static str {
        match self {
            NavbarStyle::Flat => "none",
            NavbarStyle::Elevated => NAVBAR_SHADOW,
        }
    }
}

pub fn navbar_style(scroll_y: f32) -> NavbarStyle {
    if scroll_y <= 0.0 {
        NavbarStyle::Flat
    } else {
        NavbarStyle::Elevated
    }
}

/// Page section as the host measured it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section<'a> {
    pub id: &'a str,
    /// Offset of the section's top edge from the top of the page.
    pub top: f32,
}

/// Id of the section the reader is in: the last one, in document order,
/// whose top is within [`ACTIVE_SECTION_LEAD`] of the scroll offset.
pub fn active_section<'a>(sections: &[Section<'a>], scroll_y: f32) -> Option<&'a str> {
    sections
        .iter()
        .rev()
        .find(|section| scroll_y >= section.top - ACTIVE_SECTION_LEAD)
        .map(|section| section.id)
}

/// Whether a navigation link pointing at `href` should be highlighted.
/// With no active section the bare `#` link is the current one.
pub fn is_active_link(href: &str, active: Option<&str>) -> bool {
    href.strip_prefix('#') == Some(active.unwrap_or(""))
}

/// Element id an in-page link scrolls to, if `href` is one.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

pub fn card_background(hovered: bool) -> &'static str {
    if hovered {
        CARD_HOVER_BACKGROUND
    } else {
        CARD_BACKGROUND
    }
}

/// Style of a fade-in element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reveal {
    pub opacity: f32,
    pub offset_y: f32,
}

impl Reveal {
    pub const HIDDEN: Reveal = Reveal {
        opacity: 0.0,
        offset_y: REVEAL_OFFSET_PX,
    };
    pub const SHOWN: Reveal = Reveal {
        opacity: 1.0,
        offset_y: 0.0,
    };
}

/// Whether any part of an element spanning `[top, top + height)` (viewport
/// coordinates) lies inside the viewport once the bottom margin is applied.
/// Elements taller than the viewport count as soon as their edge enters.
pub fn in_reveal_band(top: f32, height: f32, viewport_height: f32) -> bool {
    let view_bottom = (viewport_height - REVEAL_BOTTOM_MARGIN).max(0.0);
    if height <= 0.0 {
        return (0.0..view_bottom).contains(&top);
    }
    top < view_bottom && top + height > 0.0
}

/// One-way fade-in state for a fixed set of elements, addressed by index.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    revealed: Vec<bool>,
}

impl RevealTracker {
    pub fn new(count: usize) -> Self {
        Self {
            revealed: vec![false; count],
        }
    }

    /// Feed the element's current viewport geometry and get its style.
    /// Unknown indices stay hidden.
    pub fn observe(&mut self, index: usize, top: f32, height: f32, viewport_height: f32) -> Reveal {
        let Some(revealed) = self.revealed.get_mut(index) else {
            return Reveal::HIDDEN;
        };
        if !*revealed && in_reveal_band(top, height, viewport_height) {
            *revealed = true;
        }
        if *revealed {
            Reveal::SHOWN
        } else {
            Reveal::HIDDEN
        }
    }

    /// Reveal immediately, bypassing visibility (the hero title).
    pub fn force(&mut self, index: usize) {
        if let Some(revealed) = self.revealed.get_mut(index) {
            *revealed = true;
        }
    }

    pub fn state(&self, index: usize) -> Reveal {
        match self.revealed.get(index) {
            Some(true) => Reveal::SHOWN,
            _ => Reveal::HIDDEN,
        }
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|r| **r).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: [Section<'static>; 4] = [
        Section { id: "hero", top: 0.0 },
        Section { id: "about", top: 900.0 },
        Section { id: "projects", top: 1800.0 },
        Section { id: "contact", top: 2600.0 },
    ];

    #[test]
    fn navbar_elevates_once_scrolled() {
        assert_eq!(navbar_style(0.0), NavbarStyle::Flat);
        assert_eq!(navbar_style(-12.0).box_shadow(), "none");
        assert_eq!(navbar_style(1.0).box_shadow(), NAVBAR_SHADOW);
    }

    #[test]
    fn active_section_leads_by_two_hundred_pixels() {
        assert_eq!(active_section(&PAGE, 0.0), Some("hero"));
        assert_eq!(active_section(&PAGE, 699.0), Some("hero"));
        assert_eq!(active_section(&PAGE, 700.0), Some("about"));
        assert_eq!(active_section(&PAGE, 5000.0), Some("contact"));
        assert_eq!(active_section(&PAGE[1..], 10.0), None);
    }

    #[test]
    fn only_the_matching_link_is_highlighted() {
        let active = active_section(&PAGE, 1700.0);
        assert!(is_active_link("#projects", active));
        assert!(!is_active_link("#about", active));
        assert!(!is_active_link("#", active));
        assert!(!is_active_link("#projects", None));
    }

    #[test]
    fn bare_hash_link_is_current_above_every_section() {
        let active = active_section(&PAGE[1..], 10.0);
        assert_eq!(active, None);
        assert!(is_active_link("#", active));
        assert!(!is_active_link("#about", active));
        assert!(!is_active_link("https://example.com", active));
    }

    #[test]
    fn anchors_resolve_to_ids() {
        assert_eq!(anchor_target("#contact"), Some("contact"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("https://example.com"), None);
    }

    #[test]
    fn card_hover_swaps_background() {
        assert_eq!(card_background(true), CARD_HOVER_BACKGROUND);
        assert_eq!(card_background(false), CARD_BACKGROUND);
    }

    #[test]
    fn reveal_band_honours_bottom_margin() {
        // Viewport 1000 tall, reveal band ends at 950.
        assert!(in_reveal_band(0.0, 100.0, 1000.0));
        assert!(!in_reveal_band(960.0, 100.0, 1000.0));
        assert!(!in_reveal_band(950.0, 100.0, 1000.0));
        assert!(in_reveal_band(949.0, 100.0, 1000.0));
        assert!(in_reveal_band(-80.0, 100.0, 1000.0));
        assert!(!in_reveal_band(-100.0, 100.0, 1000.0));
    }

    #[test]
    fn reveal_is_one_way() {
        let mut tracker = RevealTracker::new(2);
        assert_eq!(tracker.observe(0, 2000.0, 300.0, 1000.0), Reveal::HIDDEN);
        assert_eq!(tracker.observe(0, 950.0, 300.0, 1000.0), Reveal::HIDDEN);
        assert_eq!(tracker.observe(0, 925.0, 300.0, 1000.0), Reveal::SHOWN);
        assert_eq!(tracker.observe(0, 3000.0, 300.0, 1000.0), Reveal::SHOWN);
        assert_eq!(tracker.state(1), Reveal::HIDDEN);
        assert_eq!(tracker.revealed_count(), 1);
    }

    #[test]
    fn tall_section_reveals_once_its_edge_is_on_screen() {
        let mut tracker = RevealTracker::new(1);
        let height = 6000.0;
        let viewport = 600.0;
        let mut top = 900.0;
        let mut first_shown = None;
        while top + height > 0.0 {
            if tracker.observe(0, top, height, viewport) == Reveal::SHOWN && first_shown.is_none() {
                first_shown = Some(top);
            }
            top -= 50.0;
        }
        // The band ends at 550; the first step past it reveals.
        assert_eq!(first_shown, Some(500.0));
        assert_eq!(tracker.state(0), Reveal::SHOWN);
    }

    #[test]
    fn forced_and_unknown_elements() {
        let mut tracker = RevealTracker::new(1);
        tracker.force(0);
        assert_eq!(tracker.state(0), Reveal::SHOWN);
        assert_eq!(tracker.observe(7, 0.0, 10.0, 1000.0), Reveal::HIDDEN);
    }
}
