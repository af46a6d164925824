use std::sync::Arc;

use registrar::{
    domain::{CreateCourseRequest, CreateUserRequest, Role, User},
    error::AppError,
    repository::{
        SqliteCourseRepository, SqliteEnrollmentRepository, SqliteUserRepository, UserRepository,
    },
    service::CourseService,
};
use sqlx::SqlitePool;

struct Fixture {
    users: Arc<SqliteUserRepository>,
    courses: CourseService,
}

async fn setup() -> anyhow::Result<Fixture> {
    let pool = SqlitePool::connect(":memory:").await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let users = Arc::new(SqliteUserRepository::new(pool.clone()));
    let course_repo = Arc::new(SqliteCourseRepository::new(pool.clone()));
    let enrollment_repo = Arc::new(SqliteEnrollmentRepository::new(pool.clone()));

    let courses = CourseService::new(course_repo, enrollment_repo, users.clone());

    Ok(Fixture { users, courses })
}

async fn create_user(fixture: &Fixture, subject: &str, role: Role, name: &str) -> anyhow::Result<User> {
    Ok(fixture
        .users
        .create(CreateUserRequest {
            subject: subject.to_string(),
            role,
            display_name: name.to_string(),
            email: None,
        })
        .await?)
}

fn course_request(name: &str) -> CreateCourseRequest {
    CreateCourseRequest {
        name: name.to_string(),
        description: String::new(),
        instructor_id: None,
    }
}

#[tokio::test]
async fn test_student_visibility_requires_enrollment() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let faculty = create_user(&fixture, "f-1", Role::Faculty, "Dr. Johnson").await?;
    let enrolled = create_user(&fixture, "s-1", Role::Student, "John").await?;
    let unenrolled = create_user(&fixture, "s-2", Role::Student, "Jane").await?;

    let course = fixture
        .courses
        .create_course(&faculty, course_request("Compilers"))
        .await?;
    fixture
        .courses
        .enroll(&enrolled, enrolled.id, course.id)
        .await?;

    let visible = fixture.courses.list_visible_to(&enrolled).await?;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, course.id);

    let visible = fixture.courses.list_visible_to(&unenrolled).await?;
    assert!(visible.is_empty());

    let visible = fixture.courses.list_visible_to(&faculty).await?;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, course.id);

    Ok(())
}

#[tokio::test]
async fn test_faculty_sees_exactly_their_own_courses() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let johnson = create_user(&fixture, "f-1", Role::Faculty, "Dr. Johnson").await?;
    let rivera = create_user(&fixture, "f-2", Role::Faculty, "Dr. Rivera").await?;

    let compilers = fixture
        .courses
        .create_course(&johnson, course_request("Compilers"))
        .await?;
    fixture
        .courses
        .create_course(&rivera, course_request("Databases"))
        .await?;

    let visible = fixture.courses.list_visible_to(&johnson).await?;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, compilers.id);
    assert_eq!(visible[0].instructor_id, johnson.id);

    Ok(())
}

#[tokio::test]
async fn test_admin_sees_all_courses_regardless_of_enrollment_data() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let admin = create_user(&fixture, "a-1", Role::Admin, "Admin").await?;
    let johnson = create_user(&fixture, "f-1", Role::Faculty, "Dr. Johnson").await?;
    let rivera = create_user(&fixture, "f-2", Role::Faculty, "Dr. Rivera").await?;
    let student = create_user(&fixture, "s-1", Role::Student, "John").await?;

    let compilers = fixture
        .courses
        .create_course(&johnson, course_request("Compilers"))
        .await?;
    fixture
        .courses
        .create_course(&rivera, course_request("Databases"))
        .await?;
    fixture
        .courses
        .enroll(&student, student.id, compilers.id)
        .await?;

    let visible = fixture.courses.list_visible_to(&admin).await?;
    assert_eq!(visible.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_enrolling_twice_returns_the_existing_record() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let faculty = create_user(&fixture, "f-1", Role::Faculty, "Dr. Johnson").await?;
    let student = create_user(&fixture, "s-1", Role::Student, "John").await?;

    let course = fixture
        .courses
        .create_course(&faculty, course_request("Compilers"))
        .await?;

    let first = fixture
        .courses
        .enroll(&student, student.id, course.id)
        .await?;
    let second = fixture
        .courses
        .enroll(&student, student.id, course.id)
        .await?;

    assert_eq!(first.id, second.id);

    let enrollments = fixture
        .courses
        .list_enrollments(&student, student.id)
        .await?;
    assert_eq!(enrollments.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_students_cannot_create_courses() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let admin = create_user(&fixture, "a-1", Role::Admin, "Admin").await?;
    let student = create_user(&fixture, "s-1", Role::Student, "John").await?;

    let err = fixture
        .courses
        .create_course(&student, course_request("Underwater Basket Weaving"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization));

    // Nothing reached the store
    let visible = fixture.courses.list_visible_to(&admin).await?;
    assert!(visible.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_students_cannot_enroll_others() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let faculty = create_user(&fixture, "f-1", Role::Faculty, "Dr. Johnson").await?;
    let student = create_user(&fixture, "s-1", Role::Student, "John").await?;
    let other = create_user(&fixture, "s-2", Role::Student, "Jane").await?;

    let course = fixture
        .courses
        .create_course(&faculty, course_request("Compilers"))
        .await?;

    let err = fixture
        .courses
        .enroll(&student, other.id, course.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization));

    // Admins may enroll anyone
    let admin = create_user(&fixture, "a-1", Role::Admin, "Admin").await?;
    let enrollment = fixture.courses.enroll(&admin, other.id, course.id).await?;
    assert_eq!(enrollment.student_id, other.id);
    assert_eq!(enrollment.student_name, "Jane");

    Ok(())
}

#[tokio::test]
async fn test_roster_readable_by_owner_and_admin_only() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let admin = create_user(&fixture, "a-1", Role::Admin, "Admin").await?;
    let johnson = create_user(&fixture, "f-1", Role::Faculty, "Dr. Johnson").await?;
    let rivera = create_user(&fixture, "f-2", Role::Faculty, "Dr. Rivera").await?;
    let student = create_user(&fixture, "s-1", Role::Student, "John").await?;

    let course = fixture
        .courses
        .create_course(&johnson, course_request("Compilers"))
        .await?;
    fixture
        .courses
        .enroll(&student, student.id, course.id)
        .await?;

    let roster = fixture.courses.roster(&johnson, course.id).await?;
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].student_id, student.id);

    let roster = fixture.courses.roster(&admin, course.id).await?;
    assert_eq!(roster.len(), 1);

    let err = fixture.courses.roster(&rivera, course.id).await.unwrap_err();
    assert!(matches!(err, AppError::Authorization));

    let err = fixture.courses.roster(&student, course.id).await.unwrap_err();
    assert!(matches!(err, AppError::Authorization));

    Ok(())
}

#[tokio::test]
async fn test_list_enrollments_scoped_to_self_or_admin() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let admin = create_user(&fixture, "a-1", Role::Admin, "Admin").await?;
    let faculty = create_user(&fixture, "f-1", Role::Faculty, "Dr. Johnson").await?;
    let student = create_user(&fixture, "s-1", Role::Student, "John").await?;
    let other = create_user(&fixture, "s-2", Role::Student, "Jane").await?;

    let course = fixture
        .courses
        .create_course(&faculty, course_request("Compilers"))
        .await?;
    fixture
        .courses
        .enroll(&student, student.id, course.id)
        .await?;

    assert_eq!(
        fixture
            .courses
            .list_enrollments(&student, student.id)
            .await?
            .len(),
        1
    );
    assert_eq!(
        fixture
            .courses
            .list_enrollments(&admin, student.id)
            .await?
            .len(),
        1
    );

    let err = fixture
        .courses
        .list_enrollments(&other, student.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization));

    Ok(())
}

#[tokio::test]
async fn test_admin_assigns_instructor_on_creation() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let admin = create_user(&fixture, "a-1", Role::Admin, "Admin").await?;
    let faculty = create_user(&fixture, "f-1", Role::Faculty, "Dr. Johnson").await?;
    let student = create_user(&fixture, "s-1", Role::Student, "John").await?;

    let course = fixture
        .courses
        .create_course(
            &admin,
            CreateCourseRequest {
                name: "Compilers".to_string(),
                description: String::new(),
                instructor_id: Some(faculty.id),
            },
        )
        .await?;
    assert_eq!(course.instructor_id, faculty.id);
    assert_eq!(course.instructor_name, "Dr. Johnson");
    assert_eq!(course.created_by, admin.id);

    let err = fixture
        .courses
        .create_course(
            &admin,
            CreateCourseRequest {
                name: "Databases".to_string(),
                description: String::new(),
                instructor_id: Some(student.id),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    Ok(())
}
