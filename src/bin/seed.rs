use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use registrar::{
    auth::ProviderIdentity,
    domain::{Announcement, Audience, Course, Enrollment, Role},
    identity::IdentityResolver,
    repository::{
        AnnouncementRepository, CourseRepository, EnrollmentRepository, SqliteAnnouncementRepository,
        SqliteCourseRepository, SqliteEnrollmentRepository, SqliteUserRepository, UserRepository,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🌱 Starting database seeding...");

    // Initialize database connection
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:registrar.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    // Run migrations first
    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // Initialize repositories
    let user_repo = std::sync::Arc::new(SqliteUserRepository::new(db_pool.clone()));
    let course_repo = SqliteCourseRepository::new(db_pool.clone());
    let enrollment_repo = SqliteEnrollmentRepository::new(db_pool.clone());
    let announcement_repo = SqliteAnnouncementRepository::new(db_pool.clone());

    let resolver = IdentityResolver::new(user_repo.clone());

    // Seed users. The first resolved identity picks up the admin role via
    // the bootstrap rule.
    println!("👥 Creating users...");

    let admin = resolver
        .resolve(&ProviderIdentity {
            subject: "demo-admin".to_string(),
            email: Some("admin@university.edu".to_string()),
            display_name: Some("Admin User".to_string()),
        })
        .await?;
    println!("  ✅ Created admin user (subject: demo-admin)");

    let sarah = resolver
        .resolve(&ProviderIdentity {
            subject: "demo-faculty".to_string(),
            email: Some("sarah.johnson@university.edu".to_string()),
            display_name: Some("Dr. Sarah Johnson".to_string()),
        })
        .await?;
    let sarah = user_repo
        .update_profile(sarah.id, Role::Faculty, "Dr. Sarah Johnson")
        .await?;

    let john = resolver
        .resolve(&ProviderIdentity {
            subject: "demo-student".to_string(),
            email: Some("john.student@university.edu".to_string()),
            display_name: Some("John Student".to_string()),
        })
        .await?;

    println!("  ✅ Created faculty (demo-faculty) and student (demo-student)");

    // Seed courses
    println!("📚 Creating courses...");

    let cs101 = course_repo
        .create(Course {
            id: Uuid::new_v4(),
            name: "Introduction to Computer Science".to_string(),
            description: "Fundamentals of programming, algorithms, and problem solving."
                .to_string(),
            instructor_id: sarah.id,
            instructor_name: sarah.display_name.clone(),
            created_by: sarah.id,
            created_at: Utc::now(),
        })
        .await?;

    let lit204 = course_repo
        .create(Course {
            id: Uuid::new_v4(),
            name: "Modern Literature".to_string(),
            description: "A survey of twentieth-century fiction and criticism.".to_string(),
            instructor_id: sarah.id,
            instructor_name: sarah.display_name.clone(),
            created_by: admin.id,
            created_at: Utc::now(),
        })
        .await?;

    println!("  ✅ Created 2 courses");

    // Enroll the demo student in CS101 only, leaving Modern Literature
    // invisible to them
    println!("📝 Creating enrollments...");

    enrollment_repo
        .create(Enrollment {
            id: Uuid::new_v4(),
            student_id: john.id,
            student_name: john.display_name.clone(),
            course_id: cs101.id,
            enrolled_at: Utc::now(),
        })
        .await?;

    println!("  ✅ Enrolled John Student in Introduction to Computer Science");

    // Seed announcements
    println!("📣 Creating announcements...");

    announcement_repo
        .create(Announcement {
            id: Uuid::new_v4(),
            title: "Welcome to the new semester".to_string(),
            body: "Registration is open for all departments. Check your dashboard for your current enrollments.".to_string(),
            summary: None,
            author_id: admin.id,
            author_name: admin.display_name.clone(),
            course_id: None,
            audience: Some(Audience::All),
            created_at: Utc::now(),
        })
        .await?;

    announcement_repo
        .create(Announcement {
            id: Uuid::new_v4(),
            title: "Grade submission deadline".to_string(),
            body: "Final grades are due by the end of week 16.".to_string(),
            summary: None,
            author_id: admin.id,
            author_name: admin.display_name.clone(),
            course_id: None,
            audience: Some(Audience::Faculty),
            created_at: Utc::now(),
        })
        .await?;

    announcement_repo
        .create(Announcement {
            id: Uuid::new_v4(),
            title: "Problem set 1 posted".to_string(),
            body: "The first problem set is available. It covers variables, control flow, and functions.".to_string(),
            summary: None,
            author_id: sarah.id,
            author_name: sarah.display_name.clone(),
            course_id: Some(cs101.id),
            audience: None,
            created_at: Utc::now(),
        })
        .await?;

    println!("  ✅ Created 3 announcements");

    println!("🎉 Seeding complete!");
    println!();
    println!("Demo subjects for anonymous sign-in:");
    println!("  admin:   demo-admin");
    println!("  faculty: demo-faculty");
    println!("  student: demo-student");
    println!();
    println!("Unused course for enrollment demos: {}", lit204.name);

    Ok(())
}
