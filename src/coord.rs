use std::fmt;
use std::ops;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use crate::force::Force;


pub const NUM_FILES: u8 = 9;
pub const NUM_RANKS: u8 = 9;
pub const NUM_SQUARES: usize = 81;

const_assert_eq!(NUM_SQUARES, NUM_FILES as usize * NUM_RANKS as usize);

// Ranks counted from the far side, as seen by the force: the last three ranks.
const PROMOTION_ZONE_DEPTH: u8 = 3;


// File 1 is the right-most file from Sente's point of view. Shogi lists files right to left,
// so the zero-based index grows from right to left as well.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct File {
    idx: u8,  // 0-based
}

impl File {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_FILES);
        Self { idx }
    }
    pub fn try_from_zero_based(idx: i8) -> Option<Self> {
        (0..NUM_FILES as i8).contains(&idx).then(|| Self { idx: idx as u8 })
    }
    pub fn from_number(number: u8) -> Option<Self> {
        (1..=NUM_FILES).contains(&number).then(|| Self { idx: number - 1 })
    }
    pub fn from_char(ch: char) -> Option<Self> {
        Self::from_number(ch.to_digit(10)? as u8)
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_number(self) -> u8 { self.idx + 1 }
    pub const fn to_char(self) -> char { (self.idx + b'1') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_FILES).map(Self::from_zero_based)
    }
}


// Rank 1 is Gote's back rank, rank 9 is Sente's back rank.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Rank {
    idx: u8,  // 0-based
}

impl Rank {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_RANKS);
        Self { idx }
    }
    pub fn try_from_zero_based(idx: i8) -> Option<Self> {
        (0..NUM_RANKS as i8).contains(&idx).then(|| Self { idx: idx as u8 })
    }
    pub fn from_number(number: u8) -> Option<Self> {
        (1..=NUM_RANKS).contains(&number).then(|| Self { idx: number - 1 })
    }
    pub fn from_char(ch: char) -> Option<Self> {
        Self::from_number(ch.to_digit(10)? as u8)
    }
    // USI writes ranks as letters: 'a' is rank 1.
    pub fn from_usi_char(ch: char) -> Option<Self> {
        if ch.is_ascii_lowercase() {
            Self::from_number(ch as u8 - b'a' + 1)
        } else {
            None
        }
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_number(self) -> u8 { self.idx + 1 }
    pub const fn to_char(self) -> char { (self.idx + b'1') as char }
    pub const fn to_usi_char(self) -> char { (self.idx + b'a') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_RANKS).map(Self::from_zero_based)
    }
}


// Rank from a force's point of view: 1 is the force's own back rank, 9 is the opponent's.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct SubjectiveRank {
    idx: u8,  // 0-based
}

impl SubjectiveRank {
    pub const fn from_one_based(number: u8) -> Self {
        assert!(number >= 1 && number <= NUM_RANKS);
        Self { idx: number - 1 }
    }
    pub const fn to_one_based(self) -> u8 { self.idx + 1 }
    pub fn from_rank(rank: Rank, force: Force) -> Self {
        match force {
            Force::Sente => Self { idx: NUM_RANKS - rank.idx - 1 },
            Force::Gote => Self { idx: rank.idx },
        }
    }
    pub fn to_rank(self, force: Force) -> Rank {
        match force {
            Force::Sente => Rank::from_zero_based(NUM_RANKS - self.idx - 1),
            Force::Gote => Rank::from_zero_based(self.idx),
        }
    }
    pub const fn last() -> Self { Self::from_one_based(NUM_RANKS) }
    // Number of ranks between this one and the opponent's back rank.
    pub const fn ranks_to_last(self) -> u8 { NUM_RANKS - 1 - self.idx }
}


// The conventional two-digit square number: file then rank, both 1-based ("97" = file 9, rank 7).
// May name a square that does not exist; use `Coord::from_id` to validate.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct SquareId(pub u8);

impl SquareId {
    pub fn parse(s: &str) -> Option<Self> {
        let (file, rank) = s.chars().collect_tuple()?;
        let file = File::from_char(file)?;
        let rank = Rank::from_char(rank)?;
        Some(Coord::new(file, rank).id())
    }
}

impl fmt::Display for SquareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub file: File,
    pub rank: Rank,
}

impl Coord {
    pub const fn new(file: File, rank: Rank) -> Self {
        Self { file, rank }
    }
    // Panics on numbers outside 1..=9. Intended for constants and tests.
    pub const fn at(file_number: u8, rank_number: u8) -> Self {
        Self::new(File::from_zero_based(file_number - 1), Rank::from_zero_based(rank_number - 1))
    }
    pub fn from_id(id: SquareId) -> Option<Self> {
        let file = File::from_number(id.0 / 10)?;
        let rank = Rank::from_number(id.0 % 10)?;
        Some(Self::new(file, rank))
    }
    pub fn id(self) -> SquareId {
        SquareId(self.file.to_number() * 10 + self.rank.to_number())
    }
    pub fn from_usi(s: &str) -> Option<Self> {
        let (file, rank) = s.chars().collect_tuple()?;
        Some(Self::new(File::from_char(file)?, Rank::from_usi_char(rank)?))
    }
    pub fn to_usi(self) -> String {
        format!("{}{}", self.file.to_char(), self.rank.to_usi_char())
    }
    // Board reading order: rank 1 to rank 9, each from file 9 to file 1.
    pub fn all() -> impl Iterator<Item = Coord> + Clone {
        Rank::all()
            .cartesian_product(File::all().rev())
            .map(|(rank, file)| Coord { file, rank })
    }

    pub fn offset(self, d_file: i8, d_rank: i8) -> Option<Self> {
        let file = File::try_from_zero_based(self.file.to_zero_based() as i8 + d_file)?;
        let rank = Rank::try_from_zero_based(self.rank.to_zero_based() as i8 + d_rank)?;
        Some(Self::new(file, rank))
    }

    pub fn subjective_rank(self, force: Force) -> SubjectiveRank {
        SubjectiveRank::from_rank(self.rank, force)
    }

    pub fn in_promotion_zone(self, force: Force) -> bool {
        self.subjective_rank(force).ranks_to_last() < PROMOTION_ZONE_DEPTH
    }
}

impl ops::Sub for Coord {
    type Output = (i8, i8);
    fn sub(self, other: Self) -> Self::Output {
        (
            self.file.to_zero_based() as i8 - other.file.to_zero_based() as i8,
            self.rank.to_zero_based() as i8 - other.rank.to_zero_based() as i8,
        )
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({})", self.id())
    }
}


// Chebyshev distance: the number of king steps between two squares.
pub fn distance(a: Coord, b: Coord) -> u8 {
    let (d_file, d_rank) = b - a;
    d_file.unsigned_abs().max(d_rank.unsigned_abs())
}

pub fn is_orthogonal(a: Coord, b: Coord) -> bool {
    let (d_file, d_rank) = b - a;
    a != b && (d_file == 0 || d_rank == 0)
}

pub fn is_diagonal(a: Coord, b: Coord) -> bool {
    let (d_file, d_rank) = b - a;
    a != b && d_file.abs() == d_rank.abs()
}

// Unit step leading from `from` towards `to` along a line. None unless the squares are aligned.
pub fn direction(from: Coord, to: Coord) -> Option<(i8, i8)> {
    if is_orthogonal(from, to) || is_diagonal(from, to) {
        let (d_file, d_rank) = to - from;
        Some((d_file.signum(), d_rank.signum()))
    } else {
        None
    }
}

// Squares strictly between two aligned squares. Empty for adjacent or non-aligned squares.
pub fn between(from: Coord, to: Coord) -> Vec<Coord> {
    let Some((d_file, d_rank)) = direction(from, to) else {
        return Vec::new();
    };
    let mut squares = Vec::new();
    let mut pos = from;
    while let Some(next) = pos.offset(d_file, d_rank) {
        if next == to {
            break;
        }
        squares.push(next);
        pos = next;
    }
    squares
}
