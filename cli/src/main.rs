use clap::{Parser, Subcommand};
use germangains::model::entity::{
    Course, CourseCreate, Exercise, ExerciseCreate, ExerciseOption, ExerciseOptionCreate, Lesson,
    LessonCreate, Module, ModuleCreate, UserEntity, UserEntityCreate, Vocabulary,
    VocabularyCreate,
};
use germangains::model::{CrudRepository, DbConnection, ModelManager};
use germangains::web::AuthenticatedUser;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the GermanGains DB", long_about = None)]
pub struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },

    /// Manage exercises and their answer options
    Exercise {
        #[command(subcommand)]
        action: ExerciseCommands,
    },

    /// Manage vocabulary
    Vocabulary {
        #[command(subcommand)]
        action: VocabularyCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// `user` or `admin`
        #[arg(long, default_value = "user")]
        role: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        order: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        #[arg(long)]
        course_id: i32,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        order: Option<i32>,
        #[arg(long, default_value_t = false)]
        locked: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        #[arg(long)]
        module_id: i32,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        order: Option<i32>,
        #[arg(long)]
        xp_reward: Option<i32>,
        /// Minutes
        #[arg(long)]
        estimated_time: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExerciseCommands {
    Add {
        #[arg(long)]
        lesson_id: i32,
        /// vocab_check, multiple_choice, translate or listening
        #[arg(long)]
        exercise_type: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        instruction: Option<String>,
        #[arg(long)]
        order: Option<i32>,
    },
    AddOption {
        #[arg(long)]
        exercise_id: i32,
        #[arg(long)]
        text: String,
        #[arg(long)]
        image_src: Option<String>,
        #[arg(long, default_value_t = false)]
        is_correct: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum VocabularyCommands {
    Add {
        #[arg(long)]
        lesson_id: Option<i32>,
        #[arg(long)]
        word: String,
        #[arg(long)]
        translation: String,
        #[arg(long)]
        part_of_speech: Option<String>,
        #[arg(long)]
        example_sentence: Option<String>,
        #[arg(long)]
        image_src: Option<String>,
    },
}

fn invalid_input(reason: String) -> germangains::error::AppError {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, reason).into()
}

#[tokio::main]
async fn main() -> germangains::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let db_con = DbConnection::connect(&args.database_url)?;
    let mm = ModelManager::new(db_con);
    let actor = AuthenticatedUser::system();

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add {
                username,
                password,
                first_name,
                last_name,
                role,
            } => {
                let user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreate {
                        username,
                        password_hash: germangains::auth::hash_password(&password)?,
                        first_name,
                        last_name,
                        role: Some(role),
                    },
                )
                .await?;
                println!("User created: {:?}", user);
            }
        },

        Commands::Course { action } => match action {
            CourseCommands::Add {
                title,
                description,
                image_url,
                order,
            } => {
                let data = CourseCreate {
                    title,
                    description,
                    image_url,
                    order,
                };
                data.validate().map_err(invalid_input)?;
                let course = Course::create(&mm, &actor, data).await?;
                println!("Course created: {:?}", course);
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::Add {
                course_id,
                title,
                description,
                order,
                locked,
            } => {
                let data = ModuleCreate {
                    course_id,
                    title,
                    description,
                    order,
                    is_locked: Some(locked),
                };
                data.validate().map_err(invalid_input)?;
                let module = Module::create(&mm, &actor, data).await?;
                println!("Module created: {:?}", module);
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add {
                module_id,
                title,
                description,
                order,
                xp_reward,
                estimated_time,
            } => {
                let data = LessonCreate {
                    module_id,
                    title,
                    description,
                    order,
                    xp_reward,
                    estimated_time,
                };
                data.validate().map_err(invalid_input)?;
                let lesson = Lesson::create(&mm, &actor, data).await?;
                println!("Lesson created: {:?}", lesson);
            }
        },

        Commands::Exercise { action } => match action {
            ExerciseCommands::Add {
                lesson_id,
                exercise_type,
                question,
                instruction,
                order,
            } => {
                let data = ExerciseCreate {
                    lesson_id,
                    exercise_type,
                    question,
                    instruction,
                    order,
                };
                data.validate().map_err(invalid_input)?;
                let exercise = Exercise::create(&mm, &actor, data).await?;
                println!("Exercise created: {:?}", exercise);
            }

            ExerciseCommands::AddOption {
                exercise_id,
                text,
                image_src,
                is_correct,
            } => {
                let data = ExerciseOptionCreate {
                    exercise_id,
                    text,
                    image_src,
                    is_correct: Some(is_correct),
                };
                data.validate().map_err(invalid_input)?;
                let option = ExerciseOption::create(&mm, &actor, data).await?;
                println!("Exercise option created: {:?}", option);
            }
        },

        Commands::Vocabulary { action } => match action {
            VocabularyCommands::Add {
                lesson_id,
                word,
                translation,
                part_of_speech,
                example_sentence,
                image_src,
            } => {
                let data = VocabularyCreate {
                    lesson_id,
                    word,
                    translation,
                    part_of_speech,
                    example_sentence,
                    image_src,
                };
                data.validate().map_err(invalid_input)?;
                let entry = Vocabulary::create(&mm, &actor, data).await?;
                println!("Vocabulary created: {:?}", entry);
            }
        },
    }

    Ok(())
}
