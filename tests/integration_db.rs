//! Service-level flows against a real PostgreSQL database.
//!
//! Run with `DATABASE_URL` set and `cargo test -- --ignored`.

use chrono::NaiveDate;
use hrdesk::modules::leave::model::{
    CreateLeaveRequestDto, InitializeBalanceDto, LeaveDecision, ProcessLeaveDto,
};
use hrdesk::modules::leave::service::LeaveService;
use hrdesk::modules::payroll::model::{CreatePayrollDto, PayrollAmounts};
use hrdesk::modules::payroll::service::PayrollService;
use hrdesk::modules::project_members::model::MembershipDto;
use hrdesk::modules::project_members::service::ProjectMemberService;
use hrdesk::modules::projects::model::CreateProjectDto;
use hrdesk::modules::projects::service::ProjectService;
use hrdesk::modules::notifications::service::NotificationService;
use hrdesk::modules::users::model::{CreateUserDto, User};
use hrdesk::modules::users::service::UserService;
use sqlx::PgPool;
use uuid::Uuid;

async fn create_user(pool: &PgPool, role: &str) -> User {
    UserService::create_user(
        pool,
        CreateUserDto {
            email: format!("{}@example.com", Uuid::new_v4()),
            password: "secret123".to_string(),
            full_name: "Test User".to_string(),
            mobile: None,
            address: None,
            avatar_url: None,
            department: Some("Engineering".to_string()),
            position: None,
            hire_date: None,
            role: Some(role.to_string()),
        },
    )
    .await
    .unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn leave(start: NaiveDate, end: NaiveDate) -> CreateLeaveRequestDto {
    CreateLeaveRequestDto {
        leave_type: "Annual".to_string(),
        start_date: start,
        end_date: end,
        reason: None,
        custom_reason: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_approval_deducts_balance_once(pool: PgPool) {
    let user = create_user(&pool, "Employee").await;

    let request = LeaveService::request_leave(&pool, user.id, leave(date(2025, 3, 3), date(2025, 3, 5)))
        .await
        .unwrap();
    assert_eq!(request.status, "Pending");

    let approved = LeaveService::process_request(
        &pool,
        ProcessLeaveDto {
            request_id: request.id,
            status: LeaveDecision::Approved,
            reject_reason: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(approved.status, "Approved");

    let balance = LeaveService::get_balance(&pool, user.id).await.unwrap();
    assert_eq!(balance.total_days, 9);

    let again = LeaveService::process_request(
        &pool,
        ProcessLeaveDto {
            request_id: request.id,
            status: LeaveDecision::Approved,
            reject_reason: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(again.status.as_u16(), 409);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_request_larger_than_balance_is_refused(pool: PgPool) {
    let user = create_user(&pool, "Employee").await;
    LeaveService::initialize_balance(
        &pool,
        InitializeBalanceDto {
            user_id: user.id,
            initial_days: Some(2),
        },
    )
    .await
    .unwrap();

    let err = LeaveService::request_leave(&pool, user.id, leave(date(2025, 5, 1), date(2025, 5, 3)))
        .await
        .unwrap_err();
    assert_eq!(err.status.as_u16(), 400);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_payroll_derives_statutory_fields(pool: PgPool) {
    let employee = create_user(&pool, "Employee").await;

    let payroll = PayrollService::create_payroll(
        &pool,
        CreatePayrollDto {
            employee_id: employee.id,
            amounts: PayrollAmounts {
                base_salary: 10_000_000,
                allowances: Some(500_000),
                ..Default::default()
            },
        },
    )
    .await
    .unwrap();

    assert_eq!(payroll.total_deductions, 2_050_000);
    assert_eq!(payroll.net_salary, 8_450_000);
    assert_eq!(payroll.region, "I");

    let fetched = PayrollService::get_payroll(&pool, payroll.id).await.unwrap();
    assert_eq!(fetched.email.as_deref(), Some(employee.email.as_str()));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_adding_member_twice_conflicts_and_notifies_once(pool: PgPool) {
    let manager = create_user(&pool, "Manager").await;
    let member = create_user(&pool, "Employee").await;

    let project = ProjectService::create_project(
        &pool,
        CreateProjectDto {
            name: "Payroll revamp".to_string(),
            description: None,
            start_date: None,
            end_date: None,
            manager_id: Some(manager.id),
        },
    )
    .await
    .unwrap();

    let dto = MembershipDto {
        project_id: project.id,
        user_id: member.id,
    };
    ProjectMemberService::add_member(&pool, dto).await.unwrap();
    let err = ProjectMemberService::add_member(&pool, dto).await.unwrap_err();
    assert_eq!(err.status.as_u16(), 409);

    let notifications = NotificationService::for_user(&pool, member.id).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, "PROJECT_MEMBER_ADDED");
    assert_eq!(
        notifications[0].link.as_deref(),
        Some(format!("/projects/{}", project.id).as_str())
    );

    let progress = ProjectService::progress(&pool, project.id).await.unwrap();
    assert_eq!(progress.progress, 0);
}
