mod user;
pub use user::{UserEntity, UserEntityCreate, UserEntityUpdate, XP_PER_LEVEL, level_for_xp};

mod course;
pub use course::{Course, CourseCreate, CourseUpdate};

mod module;
pub use module::{Module, ModuleCreate, ModuleFilter, ModuleUpdate, ModuleWithProgressRow};

mod lesson;
pub use lesson::{
    DEFAULT_ESTIMATED_TIME, DEFAULT_XP_REWARD, Lesson, LessonCreate, LessonFilter, LessonUpdate,
    LessonWithProgressRow,
};

mod vocabulary;
pub use vocabulary::{Vocabulary, VocabularyCreate, VocabularyFilter, VocabularyUpdate};

mod exercise;
pub use exercise::{Exercise, ExerciseCreate, ExerciseFilter, ExerciseType, ExerciseUpdate};

mod exercise_option;
pub use exercise_option::{
    ExerciseOption, ExerciseOptionCreate, ExerciseOptionFilter, ExerciseOptionUpdate,
};

mod user_progress;
pub use user_progress::{CompletionOutcome, ProgressSummary, UserProgress};
