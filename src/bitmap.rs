/// Occupancy mask of a branch whose bit `i` is set iff the branch has a child
/// for the 5-bit hash slice `i`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Bitmap(u32);

impl Bitmap {
    pub const fn new() -> Self {
        Bitmap(0)
    }

    pub fn get(self, i: u8) -> bool {
        self.0 & (1 << i) != 0
    }

    pub fn set(self, i: u8) -> Self {
        Bitmap(self.0 | (1 << i))
    }

    pub fn unset(self, i: u8) -> Self {
        Bitmap(self.0 & !(1 << i))
    }

    /// Returns bits strictly below a position.
    pub fn below(self, i: u8) -> Self {
        Bitmap(self.0 & ((1 << i) - 1))
    }

    pub fn size(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Maps a sparse bit index to a dense offset into a child array.
    pub fn offset(self, i: u8) -> usize {
        self.below(i).size()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        Bitmap::new();
    }

    #[test]
    fn get() {
        let b = Bitmap::new();

        assert!(!b.get(0));
        assert!(!b.get(1));
        assert!(!b.get(2));
        assert!(!b.get(31));
        assert!(b.set(0).get(0));
        assert!(!b.set(1).get(0));
        assert!(b.set(1).get(1));
        assert!(b.set(31).get(31));
    }

    #[test]
    fn set() {
        let b = Bitmap::new();

        assert_eq!(b.set(0), Bitmap(1));
        assert_eq!(b.set(1), Bitmap(2));
        assert_eq!(b.set(2), Bitmap(4));
        assert_eq!(b.set(31), Bitmap(1 << 31));
        assert_eq!(b.set(2).set(2), Bitmap(4));
    }

    #[test]
    fn unset() {
        let b = Bitmap::new();

        assert_eq!(b.set(0).unset(0), Bitmap(0));
        assert_eq!(b.set(1).unset(1), Bitmap(0));
        assert_eq!(b.set(0).set(1).unset(0), Bitmap(2));
        assert_eq!(b.set(0).set(1).unset(1), Bitmap(1));
        assert_eq!(b.unset(5), b);
    }

    #[test]
    fn below() {
        let b = Bitmap::new().set(0).set(3).set(31);

        assert_eq!(b.below(0), Bitmap(0));
        assert_eq!(b.below(1), Bitmap(1));
        assert_eq!(b.below(3), Bitmap(1));
        assert_eq!(b.below(4), Bitmap(0b1001));
        assert_eq!(b.below(31), Bitmap(0b1001));
    }

    #[test]
    fn size() {
        let b = Bitmap::new();

        assert_eq!(b.size(), 0);
        assert_eq!(b.set(0).size(), 1);
        assert_eq!(b.set(1).size(), 1);
        assert_eq!(b.set(0).set(1).size(), 2);
        assert_eq!(b.set(31).size(), 1);
        assert_eq!(Bitmap(u32::MAX).size(), 32);
    }

    #[test]
    fn offset() {
        let b = Bitmap::new().set(2).set(7).set(30);

        assert_eq!(b.offset(2), 0);
        assert_eq!(b.offset(5), 1);
        assert_eq!(b.offset(7), 1);
        assert_eq!(b.offset(30), 2);
        assert_eq!(b.offset(31), 3);
    }

    #[test]
    fn is_empty() {
        assert!(Bitmap::new().is_empty());
        assert!(!Bitmap::new().set(4).is_empty());
        assert!(Bitmap::new().set(4).unset(4).is_empty());
    }
}
