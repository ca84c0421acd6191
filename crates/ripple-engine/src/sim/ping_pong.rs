/// Two buffers of the same kind: one is read, the other written, then swapped.
///
/// The read and write slots are always distinct, so a step can never read
/// what it is writing.
#[derive(Debug, Clone)]
pub struct PingPong<T> {
    buffers: [T; 2],
    read: usize,
}

impl<T> PingPong<T> {
    pub fn new(first: T, second: T) -> Self {
        Self { buffers: [first, second], read: 0 }
    }

    /// Index (0 or 1) of the buffer currently read.
    #[inline]
    pub fn read_index(&self) -> usize {
        self.read
    }

    #[inline]
    pub fn read(&self) -> &T {
        &self.buffers[self.read]
    }

    #[inline]
    pub fn write(&self) -> &T {
        &self.buffers[1 - self.read]
    }

    /// Borrows the read buffer immutably and the write buffer mutably.
    pub fn split(&mut self) -> (&T, &mut T) {
        let (a, b) = self.buffers.split_at_mut(1);
        if self.read == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        }
    }

    /// Promotes the write buffer to read.
    #[inline]
    pub fn swap(&mut self) {
        self.read = 1 - self.read;
    }

    pub fn both(&self) -> [&T; 2] {
        [&self.buffers[0], &self.buffers[1]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_flips_read_and_write() {
        let mut pp = PingPong::new("a", "b");
        assert_eq!((*pp.read(), *pp.write()), ("a", "b"));
        pp.swap();
        assert_eq!((*pp.read(), *pp.write()), ("b", "a"));
        assert_eq!(pp.read_index(), 1);
    }

    #[test]
    fn split_never_aliases() {
        let mut pp = PingPong::new(vec![1], vec![2]);
        for _ in 0..3 {
            let (r, w) = pp.split();
            w[0] = r[0] + 10;
            assert!(!std::ptr::eq(r, w));
            pp.swap();
        }
        assert_eq!(pp.read()[0], 31);
    }
}
