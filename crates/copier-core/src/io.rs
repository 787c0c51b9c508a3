//! The two collaborator contracts the [`crate::Copier`] is built on.
//!
//! Both traits are object-safe so they can be used as `Box<dyn Source>` /
//! `&mut dyn Destination`. Errors are reserved for failures of the
//! underlying medium; running out of data is reported with
//! [`crate::NO_DATA`] or a short batch, never with an error.

use anyhow::Result;

/// Pull side of a copy.
pub trait Source {
    /// Read a single unit. Returns [`crate::NO_DATA`] when nothing is available.
    fn read_one(&mut self) -> Result<char>;

    /// Read up to `count` units.
    ///
    /// The batch may be shorter than requested, including empty, when the
    /// underlying data runs out.
    fn read_many(&mut self, count: usize) -> Result<Vec<char>>;
}

/// Push side of a copy.
pub trait Destination {
    /// Write a single unit.
    fn write_one(&mut self, c: char) -> Result<()>;

    /// Write a batch of units in order.
    fn write_many(&mut self, batch: &[char]) -> Result<()>;
}

impl<S: Source + ?Sized> Source for &mut S {
    fn read_one(&mut self) -> Result<char> {
        (**self).read_one()
    }

    fn read_many(&mut self, count: usize) -> Result<Vec<char>> {
        (**self).read_many(count)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn read_one(&mut self) -> Result<char> {
        (**self).read_one()
    }

    fn read_many(&mut self, count: usize) -> Result<Vec<char>> {
        (**self).read_many(count)
    }
}

impl<D: Destination + ?Sized> Destination for &mut D {
    fn write_one(&mut self, c: char) -> Result<()> {
        (**self).write_one(c)
    }

    fn write_many(&mut self, batch: &[char]) -> Result<()> {
        (**self).write_many(batch)
    }
}

impl<D: Destination + ?Sized> Destination for Box<D> {
    fn write_one(&mut self, c: char) -> Result<()> {
        (**self).write_one(c)
    }

    fn write_many(&mut self, batch: &[char]) -> Result<()> {
        (**self).write_many(batch)
    }
}

// Compile-time assertion: both traits must stay object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Source, _: &dyn Destination) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Yields the same unit forever.
    struct Repeat(char);

    impl Source for Repeat {
        fn read_one(&mut self) -> Result<char> {
            Ok(self.0)
        }

        fn read_many(&mut self, count: usize) -> Result<Vec<char>> {
            Ok(vec![self.0; count])
        }
    }

    #[derive(Default)]
    struct Sink(Vec<char>);

    impl Destination for Sink {
        fn write_one(&mut self, c: char) -> Result<()> {
            self.0.push(c);
            Ok(())
        }

        fn write_many(&mut self, batch: &[char]) -> Result<()> {
            self.0.extend_from_slice(batch);
            Ok(())
        }
    }

    #[test]
    fn boxed_source_forwards() {
        let mut source: Box<dyn Source> = Box::new(Repeat('x'));
        assert_eq!(source.read_one().unwrap(), 'x');
        assert_eq!(source.read_many(3).unwrap(), vec!['x', 'x', 'x']);
    }

    #[test]
    fn borrowed_destination_forwards() {
        fn fill<D: Destination>(mut dest: D) {
            dest.write_one('a').unwrap();
            dest.write_many(&['b', 'c']).unwrap();
        }

        let mut sink = Sink::default();
        fill(&mut sink);
        fill(&mut sink as &mut dyn Destination);
        assert_eq!(sink.0, vec!['a', 'b', 'c', 'a', 'b', 'c']);
    }
}
