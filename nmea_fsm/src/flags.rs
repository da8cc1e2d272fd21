use bitflags::bitflags;

bitflags! {
    /// Signals shared between the parser, the introspection responder and the driver loop.
    ///
    /// The parser sets `NEW_POSITION`, `NORTH`, `EAST`, `NEW_QUALITY`, `TEST_PLEASE_SEND` and `TEST9`.
    /// The driver clears `TEST_PLEASE_SEND` once it has sent the response; whoever consumes
    /// the fix clears `NEW_POSITION` and `NEW_QUALITY`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u16 {
        /// A complete fix was committed to the field store
        const NEW_POSITION = 1 << 0;
        /// Hemisphere of the last fix: 1 = North, 0 = South
        const NORTH = 1 << 1;
        /// Hemisphere of the last fix: 1 = East, 0 = West
        const EAST = 1 << 2;
        /// The harness asked for a value; the responder has a frame ready
        const TEST_PLEASE_SEND = 1 << 3;
        const TEST4 = 1 << 4;
        const TEST5 = 1 << 5;
        const TEST6 = 1 << 6;
        const TEST7 = 1 << 7;
        const TEST8 = 1 << 8;
        /// Reserved test bit, driven by the `SET-TEST-9` request and readable as flag index 3
        const TEST9 = 1 << 9;
        /// The last committed fix carried a quality code (GGA)
        const NEW_QUALITY = 1 << 10;
    }
}

impl Flags {
    /// Hemisphere bits copied from a pending fix on commit
    pub(crate) const HEMISPHERE: Flags = Flags::NORTH.union(Flags::EAST);

    /// Render a flag the way the responder sends it.
    pub(crate) const fn render(self, flag: Flags, set: u8, clear: u8) -> u8 {
        if self.contains(flag) {
            set
        } else {
            clear
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hemisphere_covers_north_and_east_only() {
        assert!(Flags::HEMISPHERE.contains(Flags::NORTH));
        assert!(Flags::HEMISPHERE.contains(Flags::EAST));
        assert!(!Flags::HEMISPHERE.intersects(Flags::NEW_POSITION | Flags::TEST9));
    }

    #[test]
    fn render_picks_character_by_bit() {
        let flags = Flags::NORTH;
        assert_eq!(flags.render(Flags::NORTH, b'N', b'S'), b'N');
        assert_eq!(flags.render(Flags::EAST, b'E', b'W'), b'W');
    }

    #[test]
    fn default_is_empty() {
        assert!(Flags::default().is_empty());
    }
}
