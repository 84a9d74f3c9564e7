//! Shared status cache
//!
//! Holds the most recently rendered fragment for every metric. Written only
//! by the updater, read by every socket connection; each commit replaces
//! whole fragments under the write lock, so readers never observe a torn
//! fragment. `has_battery` is probed once at startup and never changes.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::render;
use crate::theme::{self, Palette};

pub type SharedCache = Arc<StatusCache>;

/// Latest rendered fragment per metric
#[derive(Debug, Clone, Default)]
pub struct Fragments {
    pub cpu: String,
    pub ram: String,
    pub temperature: String,
    pub battery: String,
    pub clock: String,
    pub hostname: String,
}

pub struct StatusCache {
    fragments: RwLock<Fragments>,
    has_battery: bool,
}

impl StatusCache {
    /// Empty cache; fragments fill in as the first cycle completes
    pub fn new(has_battery: bool) -> SharedCache {
        Arc::new(Self {
            fragments: RwLock::new(Fragments::default()),
            has_battery,
        })
    }

    pub fn has_battery(&self) -> bool {
        self.has_battery
    }

    /// Apply one or more fragment replacements under the write lock
    pub fn commit<F: FnOnce(&mut Fragments)>(&self, apply: F) {
        apply(&mut self.fragments.write());
    }

    pub fn snapshot(&self) -> Fragments {
        self.fragments.read().clone()
    }

    /// Compose the full right-hand status line for one caller identity.
    /// Block order: identity@hostname, battery (when present), cpu, ram,
    /// temperature, clock, with column separators between groups, all
    /// wrapped in the main background/foreground styling.
    pub fn compose_right(&self, whoami: &str) -> String {
        let frags = self.snapshot();
        let column = theme::column();

        let mut line = String::from(" ");
        line.push_str(&render::identity(whoami));
        line.push('@');
        line.push_str(&frags.hostname);
        line.push(' ');
        line.push_str(&column);

        if self.has_battery {
            line.push_str(&frags.battery);
            line.push_str(&column);
            line.push(' ');
        }

        line.push_str(&frags.cpu);
        line.push(' ');
        line.push_str(&frags.ram);
        line.push(' ');
        line.push_str(&frags.temperature);
        line.push(' ');
        line.push_str(&column);
        line.push(' ');
        line.push_str(&frags.clock);
        line.push(' ');

        theme::bg(Palette::MainBg, &theme::fg(Palette::MainFg, &line))
    }
}
