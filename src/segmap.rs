// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Character classes ("groups") of the table-driven recognizer.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::ops::Bound::Included;

pub type GroupId = u32;

/// Inclusive segment of codepoint values.
#[derive(Clone, Copy, PartialOrd, PartialEq, Eq, Ord, Debug)]
pub struct Seg(pub u32, pub u32);

impl Display for Seg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let show = |v: u32| char::from_u32(v).map(|c| c.escape_debug().to_string()).unwrap_or_else(|| format!("\\u{{{v:x}}}"));
        if self.0 == self.1 {
            write!(f, "'{}'", show(self.0))
        } else {
            write!(f, "'{}'-'{}'", show(self.0), show(self.1))
        }
    }
}

/// Map of non-overlapping segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegMap<T>(BTreeMap<Seg, T>);

impl<T: Clone> SegMap<T> {
    pub fn new() -> Self {
        SegMap(BTreeMap::new())
    }

    /// Finds the value of the segment including `value`.
    pub fn get(&self, value: u32) -> Option<T> {
        let (Seg(_a, b), data) = self.0.range((Included(&Seg(0, 0)), Included(&Seg(value, u32::MAX)))).next_back()?;
        if *b >= value {
            Some(data.clone())
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: Seg, value: T) -> Option<T> {
        self.0.insert(key, value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Clone, const N: usize> From<[(Seg, T); N]> for SegMap<T> {
    fn from(value: [(Seg, T); N]) -> Self {
        SegMap(BTreeMap::from(value))
    }
}

/// Group of `symbol`: ASCII characters are looked up in a direct table, the other characters in
/// the individual character map, then in the segment map.
#[inline]
pub fn char_to_group(ascii_to_group: &[GroupId], utf8_to_group: &HashMap<char, GroupId>, seg_to_group: &SegMap<GroupId>, symbol: char) -> Option<GroupId> {
    if symbol.is_ascii() {
        ascii_to_group.get(symbol as usize).copied()
    } else {
        utf8_to_group.get(&symbol).copied().or_else(|| seg_to_group.get(symbol as u32))
    }
}

#[cfg(test)]
mod segmap {
    use super::*;

    #[test]
    fn lookup() {
        let map = SegMap::from([(Seg(0x80, 0xff), 1), (Seg(0x3b1, 0x3c9), 2), (Seg(0x4e00, 0x4e00), 3)]);
        let tests = vec![(0x7f, None), (0x80, Some(1)), (0xc0, Some(1)), (0x100, None), ('β' as u32, Some(2)), (0x4e00, Some(3)), (0x4e01, None)];
        for (test_id, (value, expected)) in tests.into_iter().enumerate() {
            assert_eq!(map.get(value), expected, "test {test_id}");
        }
        assert_eq!(Seg('a' as u32, 'z' as u32).to_string(), "'a'-'z'");
        assert_eq!(Seg('\n' as u32, '\n' as u32).to_string(), "'\\n'");
    }

    #[test]
    fn groups() {
        let ascii = [5; 128];
        let utf8 = HashMap::from([('é', 1)]);
        let segs = SegMap::from([(Seg('α' as u32, 'ω' as u32), 2)]);
        assert_eq!(char_to_group(&ascii, &utf8, &segs, 'a'), Some(5));
        assert_eq!(char_to_group(&ascii, &utf8, &segs, 'é'), Some(1));
        assert_eq!(char_to_group(&ascii, &utf8, &segs, 'λ'), Some(2));
        assert_eq!(char_to_group(&ascii, &utf8, &segs, '€'), None);
        assert_eq!(char_to_group(&[0; 10], &utf8, &segs, 'z'), None, "short ASCII table");
    }
}
