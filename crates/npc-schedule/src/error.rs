use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule parse error: {0}")]
    Parse(String),

    #[error("unknown task {0:?}")]
    UnknownTask(String),

    #[error("schedule {0:?} has no tasks")]
    EmptySchedule(String),

    #[error("task {task} in schedule {schedule:?}: bad parameter {param:?}")]
    BadParam {
        schedule: String,
        task:     String,
        param:    String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
