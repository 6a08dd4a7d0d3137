//! Recovery of the overlays the level editor packs into the info layer:
//! timers, switch targets and lofted item arches/lines.

use std::collections::HashSet;
use std::f64::consts::PI;
use std::fmt;
use std::vec::Vec;

use tracing::{debug, trace};

use crate::error::{BinParse, BinParseResult};
use crate::rtl::{LAYER_SIZE, MAP_WIDTH};

/// Sprite that marks a timer in the top-left corner of the map
pub const TIMER_SPRITE: u16 = 0x79;

/// Timer sprites are only looked for in the first cells of the map
pub const TIMER_SCAN: usize = 15;

pub const TRAMPOLINE_SPRITE: u16 = 193;

pub const ITEM_LINE: u16 = 11;
pub const ITEM_ARCH: u16 = 12;

/// Info values in this range point at the switch that triggers the cell
pub const SWITCH_MIN: u16 = 0x100;
pub const SWITCH_MAX: u16 = 0x8000;

/// Leading cells of every layer carry level settings, not geometry
pub const RESERVED_CELLS: usize = 7;

/// Base of the info values that give an item's height above the floor
pub const ITEM_HEIGHT_BASE: i32 = 0xB000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Right = 0,
    Up,
    Left,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
        }
    }

    /// 0 for horizontal directions, 1 for vertical ones
    pub fn axis(self) -> usize {
        self as usize % 2
    }

    /// The direction a span perpendicular to `self` is walked in
    pub fn across(self) -> Self {
        match self.axis() {
            0 => Direction::Down,
            _ => Direction::Right,
        }
    }
}

/// Cell `distance` steps from `index`.  Moves that leave the map, or a row
/// for horizontal moves, land on the sentinel cell 0 instead.
pub fn shift(index: usize, direction: Direction, distance: usize) -> usize {
    let column = index % MAP_WIDTH;

    let result = match direction {
        Direction::Up => distance
            .checked_mul(MAP_WIDTH)
            .and_then(|rows| index.checked_sub(rows)),
        Direction::Down => distance
            .checked_mul(MAP_WIDTH)
            .and_then(|rows| index.checked_add(rows)),
        Direction::Left => (column >= distance).then(|| index - distance),
        Direction::Right => (column.saturating_add(distance) < MAP_WIDTH)
            .then(|| index + distance),
    };

    result.filter(|&i| i < LAYER_SIZE).unwrap_or(0)
}

/// Map index of a packed `XXYY` coordinate
pub fn packed_index(value: u16) -> usize {
    usize::from(value / 256) + usize::from(value % 256) * MAP_WIDTH
}

/// Minutes and seconds packed as `MMSS`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockTime {
    pub minutes: u8,
    pub seconds: u8,
}

impl From<u16> for ClockTime {
    fn from(value: u16) -> Self {
        let [seconds, minutes] = value.to_le_bytes();
        ClockTime { minutes, seconds }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// A timed object and the window it is active in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerEntry {
    /// Cell of the timer sprite
    pub source: usize,
    /// Cell of the timed object
    pub target: usize,
    pub start: ClockTime,
    /// Absent when no neighbour of the target holds an end time
    pub end: Option<ClockTime>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchLabel {
    Letter(char),
    Number(u32),
}

impl SwitchLabel {
    /// Label of the `ordinal`th distinct switch: A to Z, then 1, 2, ...
    pub fn nth(ordinal: u32) -> Self {
        match ordinal {
            0..=25 => SwitchLabel::Letter(char::from(b'A' + ordinal as u8)),
            _ => SwitchLabel::Number(ordinal - 25),
        }
    }
}

impl fmt::Display for SwitchLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SwitchLabel::Letter(c) => write!(f, "{c}"),
            SwitchLabel::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwitchEntry {
    /// Cell of the switch, as referenced by the triggered cells
    pub target: usize,
    pub label: SwitchLabel,
}

/// Settings carried in cell 0 of each layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct LevelHeader {
    /// Floor texture variant
    pub floor: i32,
    /// Wall height in pixels, 64 per block
    pub height: i32,
    /// Background music track
    pub song: u16,
}

impl LevelHeader {
    pub fn from_layers(walls: &[u16], sprites: &[u16], info: &[u16]) -> Self {
        let first =
            |layer: &[u16]| i32::from(layer.first().copied().unwrap_or(0));

        let height_code = first(sprites);
        let height = if height_code < 0x100 {
            (height_code - 0x59) * 64
        } else {
            (height_code - 0x1B9) * 64
        };

        LevelHeader {
            floor: first(walls) - 179,
            height,
            song: info.first().copied().unwrap_or(0),
        }
    }
}

/// Everything `interpret` recovers from a level
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overlays {
    pub switches: Vec<SwitchEntry>,
    pub timers: Vec<TimerEntry>,
}

/// Rewrite the layers of one level in place: pull out timers, label
/// switches, loft item lines and arches to `height`, then clear the
/// reserved cells.
pub fn interpret(
    walls: &mut [u16],
    sprites: &mut [u16],
    info: &mut [u16],
    height: i32,
) -> BinParseResult<Overlays> {
    let lengths = [
        ("walls", walls.len()),
        ("sprites", sprites.len()),
        ("info", info.len()),
    ];

    for (what, len) in lengths {
        if len != LAYER_SIZE {
            return Err(BinParse::format(format!(
                "{what} layer has {len} cells, expected {LAYER_SIZE}"
            )));
        }
    }

    let timers = collect_timers(sprites, info)?;
    let switches = scan_info(sprites, info, height, &timers);

    for layer in [walls, sprites, info] {
        layer[..RESERVED_CELLS].fill(0);
    }

    debug!(
        "Level overlays: {} timers, {} switches",
        timers.len(),
        switches.len()
    );

    Ok(Overlays { switches, timers })
}

fn collect_timers(
    sprites: &mut [u16],
    info: &mut [u16],
) -> BinParseResult<Vec<TimerEntry>> {
    const NEIGHBOURS: [Direction; 4] =
        [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    let mut timers = Vec::new();

    for source in 0..TIMER_SCAN {
        if sprites[source] != TIMER_SPRITE {
            continue;
        }

        let target = packed_index(info[source]);
        let start = info
            .get(target)
            .copied()
            .map(ClockTime::from)
            .ok_or_else(|| {
                BinParse::format(format!(
                    "Timer at {source} points outside the map ({target})"
                ))
            })?;

        info[source] = 0;
        info[target] = 0;
        sprites[source] = 0;

        let end = NEIGHBOURS
            .iter()
            .map(|&dir| shift(target, dir, 1))
            .find(|&cell| info[cell] > 0)
            .map(|cell| {
                let end = ClockTime::from(info[cell]);
                info[cell] = 0;
                end
            });

        trace!("Timer at {source}: cell {target} from {start} until {end:?}");

        timers.push(TimerEntry {
            source,
            target,
            start,
            end,
        });
    }

    Ok(timers)
}

/// One pass over the info layer in index order.  Lofting rewrites cells
/// ahead of the scan, so each value is read as the scan reaches it.
fn scan_info(
    sprites: &[u16],
    info: &mut [u16],
    height: i32,
    timers: &[TimerEntry],
) -> Vec<SwitchEntry> {
    let mut seen: HashSet<usize> = timers.iter().map(|t| t.target).collect();
    let mut switches = Vec::new();

    for index in RESERVED_CELLS..info.len() {
        let value = info[index];

        if value > SWITCH_MIN && value < SWITCH_MAX {
            let target = packed_index(value);

            if seen.insert(target) {
                let label = SwitchLabel::nth(switches.len() as u32);
                switches.push(SwitchEntry { target, label });
            }
        }

        if value == ITEM_LINE || value == ITEM_ARCH {
            loft_items(sprites, info, index, value, height);
        }
    }

    switches
}

/// Extent of the block of `value` cells whose top-left corner is `index`,
/// as (width, height)
fn region(info: &[u16], index: usize, value: u16) -> [usize; 2] {
    let mut region = [0usize; 2];

    for dir in [Direction::Right, Direction::Down] {
        let mut pos = index;

        while info[pos] == value {
            region[dir.axis()] += 1;
            pos = shift(pos, dir, 1);

            if pos == 0 {
                break;
            }
        }
    }

    region
}

/// Items in a line or arch face away from the trampoline that launches the
/// player over them
fn facing(sprites: &[u16], index: usize, region: [usize; 2]) -> Direction {
    use Direction::*;

    let candidates = if region[0] > region[1] {
        [Left, Right, Up, Down]
    } else {
        [Up, Down, Left, Right]
    };

    candidates
        .iter()
        .copied()
        .find(|&dir| {
            let across = dir.across();
            let mut pos = shift(index, across, region[across.axis()] / 2);

            if matches!(dir, Right | Down) {
                pos = shift(pos, dir, region[dir.axis()] - 1);
            }

            sprites[shift(pos, dir, 1)] == TRAMPOLINE_SPRITE
        })
        .map(Direction::opposite)
        .unwrap_or(candidates[0])
}

fn loft_items(
    sprites: &[u16],
    info: &mut [u16],
    index: usize,
    value: u16,
    height: i32,
) {
    let region = region(info, index, value);
    let facing = facing(sprites, index, region);
    let across = facing.across();
    let length = region[facing.axis()];
    let span = region[across.axis()];

    let mut pos = match facing {
        Direction::Left | Direction::Up => {
            shift(index, facing.opposite(), length - 1)
        }
        _ => index,
    };

    trace!("Lofting {value} at {index}: {region:?} facing {facing:?}");

    for i in 0..length {
        let home = pos;
        let offset = match value {
            ITEM_LINE => line_offset(i, length, height),
            _ => arch_offset(i, length, height),
        };

        for _ in 0..span {
            info[pos] = (ITEM_HEIGHT_BASE + offset) as u16;
            pos = shift(pos, across, 1);
        }

        pos = shift(home, facing, 1);
    }
}

/// Half a sine wave over the length of the line, truncated toward zero
fn line_offset(i: usize, length: usize, height: i32) -> i32 {
    let phase = (i as f64 * PI / length as f64).sin();
    (phase * f64::from(height - 64) / 4.0) as i32
}

/// Linear ramp from the floor to the top of the wall, rounded down
fn arch_offset(i: usize, length: usize, height: i32) -> i32 {
    if length < 2 {
        return 0;
    }

    (i as i32 * (height - 64)).div_euclid(4 * (length as i32 - 1))
}
