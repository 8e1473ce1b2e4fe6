//! EWMH dock hints for the demo window on X11.
//!
//! GTK4 has no API for window placement, window types or struts, so these
//! are set as raw properties on the window's XID through a second X
//! connection. They must be applied before the window is mapped: the
//! window manager reads the window type, state and override-redirect flag
//! at map time.

use anyhow::Result;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    AtomEnum, ChangeWindowAttributesAux, ConfigureWindowAux, ConnectionExt as _, PropMode,
};
use x11rb::wrapper::ConnectionExt as _;

use crate::config::DemoConfig;

const ATOM_NAMES: [&str; 8] = [
    "_NET_WM_WINDOW_TYPE",
    "_NET_WM_WINDOW_TYPE_DOCK",
    "_NET_WM_DESKTOP",
    "_NET_WM_STRUT_PARTIAL",
    "_NET_WM_STRUT",
    "_NET_WM_STATE",
    "_NET_WM_STATE_STICKY",
    "_NET_WM_STATE_ABOVE",
];

/// `_NET_WM_DESKTOP` value meaning "all desktops".
pub const ALL_DESKTOPS: u32 = 0xFFFF_FFFF;

// _NET_WM_STRUT_PARTIAL slots
const TOP: usize = 2;
const TOP_START_X: usize = 8;
const TOP_END_X: usize = 9;

/// Window placement and reserved screen space derived from the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockHints {
    pub x: i32,
    pub y: i32,
    /// left, right, top, bottom, then the start/end pairs for each edge.
    pub strut_partial: [u32; 12],
}

impl DockHints {
    /// Reserves the strip above the window's bottom edge, spanning its width.
    pub fn for_config(config: &DemoConfig) -> Self {
        let g = config.geometry;
        let x = g.x.max(0) as u32;
        let y = g.y.max(0) as u32;

        let mut strut_partial = [0u32; 12];
        strut_partial[TOP] = y.saturating_add(g.height);
        strut_partial[TOP_START_X] = x;
        strut_partial[TOP_END_X] = x.saturating_add(g.width);

        Self { x: g.x, y: g.y, strut_partial }
    }

    /// The legacy `_NET_WM_STRUT` value: the four edge widths.
    pub fn strut(&self) -> [u32; 4] {
        [
            self.strut_partial[0],
            self.strut_partial[1],
            self.strut_partial[2],
            self.strut_partial[3],
        ]
    }

    /// Sets the dock properties on `window`, moves it to the requested
    /// origin and takes it out of window manager control.
    pub fn apply(&self, window: u32) -> Result<()> {
        let (conn, _screen) = x11rb::connect(None)?;

        let cookies = ATOM_NAMES
            .iter()
            .map(|name| conn.intern_atom(false, name.as_bytes()))
            .collect::<Result<Vec<_>, _>>()?;
        let mut atoms = [0u32; ATOM_NAMES.len()];
        for (slot, cookie) in atoms.iter_mut().zip(cookies) {
            *slot = cookie.reply()?.atom;
        }
        let [window_type, dock, desktop, strut_partial, strut, state, sticky, above] = atoms;

        conn.change_property32(PropMode::REPLACE, window, window_type, AtomEnum::ATOM, &[dock])?;
        conn.change_property32(PropMode::APPEND, window, state, AtomEnum::ATOM, &[sticky, above])?;
        conn.change_property32(PropMode::REPLACE, window, desktop, AtomEnum::CARDINAL, &[ALL_DESKTOPS])?;
        conn.change_property32(
            PropMode::REPLACE,
            window,
            strut_partial,
            AtomEnum::CARDINAL,
            &self.strut_partial,
        )?;
        conn.change_property32(PropMode::REPLACE, window, strut, AtomEnum::CARDINAL, &self.strut())?;

        conn.configure_window(window, &ConfigureWindowAux::new().x(self.x).y(self.y))?;
        // Keeps the window out of WM tabbing.
        conn.change_window_attributes(window, &ChangeWindowAttributesAux::new().override_redirect(1u32))?;

        // Round trip so everything lands before GTK maps the window.
        conn.flush()?;
        conn.get_input_focus()?.reply()?;

        log::debug!("applied dock hints to X11 window {:#x}", window);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_reserves_the_strip_above_it() {
        let hints = DockHints::for_config(&DemoConfig::default());
        assert_eq!((hints.x, hints.y), (200, 200));
        assert_eq!(hints.strut_partial, [0, 0, 400, 0, 0, 0, 0, 0, 200, 400, 0, 0]);
        assert_eq!(hints.strut(), [0, 0, 400, 0]);
    }

    #[test]
    fn negative_origin_is_clamped_in_struts_only() {
        let cfg = DemoConfig::builder().origin(-50, -10).size(100, 40).build().unwrap();
        let hints = DockHints::for_config(&cfg);
        assert_eq!((hints.x, hints.y), (-50, -10));
        assert_eq!(hints.strut_partial[TOP], 40);
        assert_eq!(hints.strut_partial[TOP_START_X], 0);
        assert_eq!(hints.strut_partial[TOP_END_X], 100);
    }
}
