use notify::event::ModifyKind;
use notify::{Event, EventKind};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::path::PathBuf;

/// Bitmask of the kinds of change a notification carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct OpMask(u8);

impl OpMask {
    pub const CREATE: OpMask = OpMask(1 << 0);
    pub const WRITE: OpMask = OpMask(1 << 1);
    pub const REMOVE: OpMask = OpMask(1 << 2);
    pub const RENAME: OpMask = OpMask(1 << 3);
    pub const CHMOD: OpMask = OpMask(1 << 4);

    const NAMES: [(OpMask, &'static str); 5] = [
        (OpMask::CREATE, "CREATE"),
        (OpMask::WRITE, "WRITE"),
        (OpMask::REMOVE, "REMOVE"),
        (OpMask::RENAME, "RENAME"),
        (OpMask::CHMOD, "CHMOD"),
    ];

    pub const fn empty() -> Self {
        OpMask(0)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set
    pub const fn contains(&self, other: OpMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit of `other` is set
    pub const fn intersects(&self, other: OpMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for OpMask {
    type Output = OpMask;

    fn bitor(self, rhs: OpMask) -> OpMask {
        OpMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for OpMask {
    fn bitor_assign(&mut self, rhs: OpMask) {
        self.0 |= rhs.0;
    }
}

impl From<&EventKind> for OpMask {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => OpMask::CREATE,
            EventKind::Modify(ModifyKind::Name(_)) => OpMask::RENAME,
            EventKind::Modify(ModifyKind::Metadata(_)) => OpMask::CHMOD,
            EventKind::Modify(_) => OpMask::WRITE,
            EventKind::Remove(_) => OpMask::REMOVE,
            // Access (including our own previews), Any and Other are not changes
            _ => OpMask::empty(),
        }
    }
}

impl fmt::Display for OpMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (op, name) in OpMask::NAMES {
            if self.contains(op) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// One affected path of a raw notify event, with its operation mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotification {
    pub path: PathBuf,
    pub ops: OpMask,
}

impl ChangeNotification {
    /// Split a raw event into one notification per path it names
    pub fn from_event(event: &Event) -> Vec<ChangeNotification> {
        let ops = OpMask::from(&event.kind);
        event
            .paths
            .iter()
            .map(|path| ChangeNotification {
                path: path.clone(),
                ops,
            })
            .collect()
    }
}

impl fmt::Display for ChangeNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.path.display().to_string(), self.ops)
    }
}
