mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::{TestContext, bearer};
use rust_course_hub::models::files::entities::NewStoredFile;
use rust_course_hub::models::submissions::entities::Submission;
use rust_course_hub::models::submissions::requests::NewSubmission;
use rust_course_hub::models::tasks::requests::NewTask;
use rust_course_hub::models::topics::requests::NewTopic;
use rust_course_hub::models::users::entities::User;
use rust_course_hub::policy::SubmissionScope;

async fn upload_record(ctx: &TestContext, owner: &User, token: &str) {
    ctx.storage
        .create_file(NewStoredFile {
            download_token: token.to_string(),
            original_name: "answer.pdf".to_string(),
            stored_name: format!("{token}.bin"),
            file_size: 4,
            content_type: "application/pdf".to_string(),
            uploader_id: owner.id,
        })
        .await
        .expect("create file record");
}

async fn seed_task(ctx: &TestContext, staff: &User) -> i64 {
    let topic = ctx
        .storage
        .create_topic(NewTopic {
            title: "Traits".to_string(),
            description: String::new(),
        })
        .await
        .expect("create topic");
    ctx.storage
        .create_task(NewTask {
            topic_id: topic.id,
            title: "Implement Display".to_string(),
            description: String::new(),
            attachment: None,
            creator_id: staff.id,
        })
        .await
        .expect("create task")
        .id
}

async fn seed_submission(ctx: &TestContext, owner: &User, task_id: i64, token: &str) -> i64 {
    upload_record(ctx, owner, token).await;
    ctx.storage
        .create_submission(NewSubmission {
            task_id,
            user_id: owner.id,
            file: token.to_string(),
        })
        .await
        .expect("create submission")
        .id
}

async fn stored_submission(ctx: &TestContext, id: i64) -> Option<Submission> {
    ctx.storage
        .get_submission_by_id(id, SubmissionScope::All)
        .await
        .expect("read submission")
}

#[actix_web::test]
async fn test_submission_grading_scenario() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);

    let staff_a = ctx.user("staff_a", true).await;
    let student_b = ctx.user("student_b", false).await;
    let staff_c = ctx.user("staff_c", true).await;
    let student_d = ctx.user("student_d", false).await;

    // 教职人员 A 创建主题与任务
    let req = test::TestRequest::post()
        .uri("/api/v1/topics")
        .insert_header(bearer(&staff_a))
        .set_json(json!({"title": "Ownership", "description": "Borrowing rules"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let topic_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(bearer(&staff_a))
        .set_json(json!({"topic": topic_id, "title": "Fix the borrow checker errors"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let task_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["creator_id"].as_i64(), Some(staff_a.id));

    // 学员 B 提交，伪造 user 与 grade
    upload_record(&ctx, &student_b, "b0file").await;
    let req = test::TestRequest::post()
        .uri("/api/v1/submissions")
        .insert_header(bearer(&student_b))
        .set_json(json!({
            "task": task_id,
            "file": "b0file",
            "user": staff_a.id,
            "grade": 100
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let submission_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["user_id"].as_i64(), Some(student_b.id));
    assert!(body["data"]["grade"].is_null());

    // 教职人员 C 评分
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/submissions/{submission_id}"))
        .insert_header(bearer(&staff_c))
        .set_json(json!({"grade": 90}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 学员 B 读取到成绩，自行修改成绩被静默忽略
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/submissions/{submission_id}"))
        .insert_header(bearer(&student_b))
        .set_json(json!({"grade": 10}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/submissions/{submission_id}"))
        .insert_header(bearer(&student_b))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["grade"].as_i64(), Some(90));

    // 学员 D 看不到 B 的提交
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/submissions/{submission_id}"))
        .insert_header(bearer(&student_d))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/v1/submissions")
        .insert_header(bearer(&student_d))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(0));

    let req = test::TestRequest::get()
        .uri("/api/v1/submissions")
        .insert_header(bearer(&staff_c))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn test_catalog_write_permissions() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);
    let student = ctx.user("student", false).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/topics")
        .set_json(json!({"title": "Anonymous"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/topics")
        .insert_header(bearer(&student))
        .set_json(json!({"title": "Student topic"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // 目录读取对匿名用户开放
    let req = test::TestRequest::get().uri("/api/v1/topics").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/v1/topics/999").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    // 嵌套视图需要登录
    let req = test::TestRequest::get()
        .uri("/api/v1/topics/1/videos")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_reference_validation() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);
    let staff = ctx.user("staff", true).await;
    let student = ctx.user("student", false).await;
    let other = ctx.user("other", false).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(bearer(&staff))
        .set_json(json!({"topic": 42, "title": "Orphan"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["topic"].is_array());

    // 不能引用他人上传的文件
    upload_record(&ctx, &other, "otherfile").await;
    let req = test::TestRequest::post()
        .uri("/api/v1/topics")
        .insert_header(bearer(&staff))
        .set_json(json!({"title": "Lifetimes"}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let topic_id = body["data"]["id"].as_i64().unwrap();
    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(bearer(&staff))
        .set_json(json!({"topic": topic_id, "title": "Annotate"}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let task_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/submissions")
        .insert_header(bearer(&student))
        .set_json(json!({"task": task_id, "file": "otherfile"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["file"].is_array());
}

#[actix_web::test]
async fn test_api_schema_requires_authentication() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);
    let student = ctx.user("student", false).await;

    let req = test::TestRequest::get().uri("/api/v1/schema").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/schema")
        .insert_header(bearer(&student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["routes"].as_array().is_some_and(|r| !r.is_empty()));

    let req = test::TestRequest::get()
        .uri("/api/v1/")
        .insert_header(bearer(&student))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["username"], "student");
}

#[actix_web::test]
async fn test_non_staff_grade_is_dropped_without_validation() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);
    let staff = ctx.user("grader", true).await;
    let student = ctx.user("learner", false).await;
    let task_id = seed_task(&ctx, &staff).await;

    // 掩码外的字段即使类型错误也只会被丢弃
    upload_record(&ctx, &student, "learnerfile").await;
    for extra in [
        json!({"grade": "A+"}),
        json!({"grade": 99_999_999_999_i64}),
        json!({"user": "someone-else"}),
    ] {
        let mut body = json!({"task": task_id, "file": "learnerfile"});
        if let (Some(target), Some(fields)) = (body.as_object_mut(), extra.as_object()) {
            target.extend(fields.clone());
        }
        let req = test::TestRequest::post()
            .uri("/api/v1/submissions")
            .insert_header(bearer(&student))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED, "payload extra {extra}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["user_id"].as_i64(), Some(student.id));
        assert!(body["data"]["grade"].is_null());
    }

    let submission_id = seed_submission(&ctx, &student, task_id, "gradedfile").await;
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/submissions/{submission_id}"))
        .insert_header(bearer(&staff))
        .set_json(json!({"grade": 70}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    for grade in [json!("A+"), json!(99_999_999_999_i64)] {
        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/submissions/{submission_id}"))
            .insert_header(bearer(&student))
            .set_json(json!({"grade": grade}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
    let stored = stored_submission(&ctx, submission_id).await.expect("still present");
    assert_eq!(stored.grade, Some(70));

    // 教职人员提交的非法成绩是字段错误
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/submissions/{submission_id}"))
        .insert_header(bearer(&staff))
        .set_json(json!({"grade": "A+"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["grade"].is_array());
    let stored = stored_submission(&ctx, submission_id).await.expect("still present");
    assert_eq!(stored.grade, Some(70));
}

#[actix_web::test]
async fn test_foreign_submission_writes_are_hidden() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);
    let staff = ctx.user("grader", true).await;
    let owner = ctx.user("owner", false).await;
    let stranger = ctx.user("stranger", false).await;
    let task_id = seed_task(&ctx, &staff).await;
    let submission_id = seed_submission(&ctx, &owner, task_id, "ownerfile").await;
    upload_record(&ctx, &stranger, "strangerfile").await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/submissions/{submission_id}"))
        .insert_header(bearer(&staff))
        .set_json(json!({"grade": 55}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/submissions/{submission_id}"))
        .insert_header(bearer(&stranger))
        .set_json(json!({"file": "strangerfile"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/submissions/{submission_id}"))
        .insert_header(bearer(&stranger))
        .set_json(json!({"task": task_id, "file": "strangerfile"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/submissions/{submission_id}"))
        .insert_header(bearer(&stranger))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    // 行未被改动
    let stored = stored_submission(&ctx, submission_id).await.expect("still present");
    assert_eq!(stored.user_id, owner.id);
    assert_eq!(stored.file, "ownerfile");
    assert_eq!(stored.grade, Some(55));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/submissions/{submission_id}"))
        .insert_header(bearer(&staff))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["grade"].as_i64(), Some(55));
    assert_eq!(body["data"]["file"], "ownerfile");
}

#[actix_web::test]
async fn test_submission_deletion() {
    let ctx = TestContext::new().await;
    let app = test_app!(ctx);
    let staff = ctx.user("grader", true).await;
    let owner = ctx.user("owner", false).await;
    let other = ctx.user("other", false).await;
    let task_id = seed_task(&ctx, &staff).await;

    // 所有者可以删除自己的提交
    let own = seed_submission(&ctx, &owner, task_id, "ownfile").await;
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/submissions/{own}"))
        .insert_header(bearer(&owner))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(stored_submission(&ctx, own).await.is_none());

    // 教职人员可以删除任意提交
    let foreign = seed_submission(&ctx, &other, task_id, "otherfile").await;
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/submissions/{foreign}"))
        .insert_header(bearer(&staff))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(stored_submission(&ctx, foreign).await.is_none());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/submissions/{foreign}"))
        .insert_header(bearer(&staff))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
