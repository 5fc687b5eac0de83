// SPDX-License-Identifier: MIT
//
// Text attributes.
//
// The viewer draws plain bytes; the only styling it ever emits is reverse
// video for the status bar. The attribute set still lives in a bitfield so
// `ansi::attrs` can emit any combination as one SGR sequence.

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// These map directly to SGR (Select Graphic Rendition) parameters:
    ///
    /// ```
    /// use tilde_term::style::Attr;
    ///
    /// let style = Attr::BOLD | Attr::INVERSE;
    /// assert!(style.contains(Attr::INVERSE));
    /// assert!(!style.contains(Attr::UNDERLINE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1 — increased intensity.
        const BOLD      = 1 << 0;
        /// SGR 2 — decreased intensity (faint).
        const DIM       = 1 << 1;
        /// SGR 4 — single underline.
        const UNDERLINE = 1 << 2;
        /// SGR 7 — swap foreground and background.
        const INVERSE   = 1 << 3;
    }
}

impl Attr {
    /// SGR parameter codes for every set attribute, in ascending order.
    pub(crate) fn codes(self) -> impl Iterator<Item = &'static [u8]> {
        [
            (Self::BOLD, b"1".as_slice()),
            (Self::DIM, b"2".as_slice()),
            (Self::UNDERLINE, b"4".as_slice()),
            (Self::INVERSE, b"7".as_slice()),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, code)| code)
    }
}
