//! Domain model (ids, status, tasks, grouped view, events, errors).

pub mod draft;
pub mod errors;
pub mod events;
pub mod groups;
pub mod ids;
pub mod status;
pub mod task;

pub use self::draft::{DraftError, DraftErrors, TaskDraft, ValidDraft};
pub use self::errors::{ErrorKind, Operation, StoreError, TableError};
pub use self::events::StoreEvent;
pub use self::groups::{StatusCounts, TaskGroups};
pub use self::ids::{TaskId, UserId};
pub use self::status::{ParseStatusError, TaskStatus};
pub use self::task::{Session, Task, TaskPatch};
