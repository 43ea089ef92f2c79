//! Database seeder for Gurukul development and testing.
//!
//! Seeds the operator accounts, the course catalog, and a demo enquiry and
//! admission so the register screens have something to show.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use gurukul_core::auth::hash_password;
use gurukul_db::entities::{
    courses, enquiries, sea_orm_active_enums::UserRole, students, users,
};

/// Admin operator ID (consistent for all seeds)
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Front-desk operator ID (consistent for all seeds)
const STAFF_USER_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Demo enquiry ID (consistent for all seeds)
const DEMO_ENQUIRY_ID: &str = "00000000-0000-0000-0000-000000000011";
/// Demo student ID (consistent for all seeds)
const DEMO_STUDENT_ID: &str = "00000000-0000-0000-0000-000000000012";

/// Dev-only password for both seeded operators.
const DEV_PASSWORD: &str = "gurukul123";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = gurukul_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding operators...");
    seed_operators(&db).await;

    println!("Seeding course catalog...");
    seed_courses(&db).await;

    println!("Seeding demo enquiry...");
    seed_demo_enquiry(&db).await;

    println!("Seeding demo admission...");
    seed_demo_student(&db).await;

    println!("Seeding complete!");
    println!("  Login: admin@gurukul.dev / {DEV_PASSWORD} (change this outside development)");
}

fn admin_user_id() -> Uuid {
    Uuid::parse_str(ADMIN_USER_ID).unwrap()
}

fn staff_user_id() -> Uuid {
    Uuid::parse_str(STAFF_USER_ID).unwrap()
}

fn demo_enquiry_id() -> Uuid {
    Uuid::parse_str(DEMO_ENQUIRY_ID).unwrap()
}

fn demo_student_id() -> Uuid {
    Uuid::parse_str(DEMO_STUDENT_ID).unwrap()
}

/// Seeds the admin and front-desk operators with a known dev password.
async fn seed_operators(db: &DatabaseConnection) {
    let operators = [
        (
            admin_user_id(),
            "admin@gurukul.dev",
            "Admin",
            UserRole::Admin,
        ),
        (
            staff_user_id(),
            "frontdesk@gurukul.dev",
            "Front Desk",
            UserRole::Staff,
        ),
    ];

    for (id, email, full_name, role) in operators {
        if users::Entity::find_by_id(id).one(db).await.ok().flatten().is_some() {
            println!("  Operator {email} already exists, skipping...");
            continue;
        }

        let password_hash = match hash_password(DEV_PASSWORD) {
            Ok(hash) => hash,
            Err(e) => {
                eprintln!("Failed to hash dev password: {e}");
                return;
            }
        };

        let user = users::ActiveModel {
            id: Set(id),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            full_name: Set(full_name.to_string()),
            role: Set(role),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = user.insert(db).await {
            eprintln!("Failed to insert operator {email}: {e}");
        } else {
            println!("  Created operator: {email}");
        }
    }
}

/// Seeds the course catalog typical for a small training center.
async fn seed_courses(db: &DatabaseConnection) {
    let catalog = [
        ("TALLY", "Tally Prime with GST", 3, 6000),
        ("CCC", "Course on Computer Concepts", 3, 3500),
        ("DCA", "Diploma in Computer Applications", 6, 8000),
        ("ADCA", "Advanced Diploma in Computer Applications", 12, 12000),
        ("TYP", "Hindi & English Typing", 6, 4000),
        ("SPENG", "Spoken English", 3, 5000),
    ];

    let mut inserted = 0;
    for (code, name, duration_months, default_fees) in catalog {
        let course = courses::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            code: Set(code.to_string()),
            duration_months: Set(duration_months),
            default_fees: Set(Decimal::from(default_fees)),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = course.insert(db).await {
            // Ignore duplicate key errors (course already seeded)
            if !e.to_string().contains("duplicate key") {
                eprintln!("Failed to insert course {code}: {e}");
            }
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} courses");
}

/// Seeds a demo enquiry for the register screen.
async fn seed_demo_enquiry(db: &DatabaseConnection) {
    if enquiries::Entity::find_by_id(demo_enquiry_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo enquiry already exists, skipping...");
        return;
    }

    let enquiry = enquiries::ActiveModel {
        id: Set(demo_enquiry_id()),
        name: Set("Sunita Sharma".to_string()),
        mobile: Set("9812345670".to_string()),
        education: Set("12th".to_string()),
        course_interest: Set("DCA".to_string()),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = enquiry.insert(db).await {
        eprintln!("Failed to insert demo enquiry: {e}");
    } else {
        println!("  Created demo enquiry: Sunita Sharma");
    }
}

/// Seeds a demo admission against the Tally course.
async fn seed_demo_student(db: &DatabaseConnection) {
    if students::Entity::find_by_id(demo_student_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo student already exists, skipping...");
        return;
    }

    let course = courses::Entity::find()
        .filter(courses::Column::Code.eq("TALLY"))
        .one(db)
        .await
        .ok()
        .flatten();

    let Some(course) = course else {
        eprintln!("Tally course missing, cannot seed demo student");
        return;
    };

    let student = students::ActiveModel {
        id: Set(demo_student_id()),
        enquiry_id: Set(None),
        full_name: Set("Ravi Kumar".to_string()),
        mobile: Set("9876543210".to_string()),
        email: Set(None),
        education: Set("B.Com".to_string()),
        address: Set(None),
        course_id: Set(course.id),
        custom_course: Set(None),
        admission_date: Set(Utc::now().date_naive()),
        total_fees: Set(course.default_fees),
        paid_fees: Set(Decimal::ZERO),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = student.insert(db).await {
        eprintln!("Failed to insert demo student: {e}");
    } else {
        println!("  Created demo student: Ravi Kumar ({})", course.name);
    }
}
