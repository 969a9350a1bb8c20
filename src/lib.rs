pub mod app;
pub mod hints;
pub mod platform;
pub mod progress;
pub mod remote;
pub mod session;
pub mod storage;
pub mod sync_queue;

pub use app::GameApp;
pub use hints::{HintStore, CHAPTER_BONUS_HINTS, DEFAULT_HINTS, HINTS_KEY};
pub use platform::{
    Clock, Connectivity, FixedClock, Identity, StubConnectivity, StubIdentity, SystemClock,
};
pub use progress::{ChapterProgress, LevelProgress, ProgressStore, PROGRESS_KEY, PROGRESS_VERSION};
pub use remote::{
    level_key, user_progress_path, MemoryRemote, RemoteError, RemoteLevelRecord,
    RemoteProgressDoc, RemoteStore, USERS_COLLECTION,
};
pub use session::{GameSession, HintMove, TilePress, SESSION_KEY};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use sync_queue::{
    FlushOutcome, QueuedProgress, SkipReason, SyncQueue, SYNC_QUEUE_KEY, SYNC_QUEUE_VERSION,
};
