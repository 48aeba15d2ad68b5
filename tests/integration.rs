use serde_json::json;
use skill_catalog::{build_state, routes::build_router};

async fn spawn_server() -> (String, reqwest::Client) {
    let state = build_state().expect("state");
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), reqwest::Client::new())
}

#[tokio::test]
async fn health() {
    let (base, client) = spawn_server().await;
    let resp = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn topics_list_and_lookup() {
    let (base, client) = spawn_server().await;

    let list = client
        .get(format!("{}/api/v1/topics", base))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(list["total"], 10);
    assert_eq!(list["items"][0]["id"], "react");
    assert!(list["items"][0].get("questions").is_none());

    let python = client
        .get(format!("{}/api/v1/topics/python", base))
        .send()
        .await
        .unwrap();
    assert_eq!(python.status(), 200);
    let python = python.json::<serde_json::Value>().await.unwrap();
    assert_eq!(python["route"], "/assessments/python");
    assert_eq!(python["questionCount"], 300);
    assert_eq!(python["timeLimit"], 20);
    assert_eq!(python["icon"], json!({"kind": "emoji", "value": "🐍"}));

    let questions = client
        .get(format!("{}/api/v1/topics/python/questions", base))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(questions["total"], 300);
    assert_eq!(questions["items"][0]["id"], "python-1");
    assert_eq!(questions["items"][299]["id"], "python-300");
}

#[tokio::test]
async fn unknown_ids_are_404_with_request_id() {
    let (base, client) = spawn_server().await;

    let resp = client
        .get(format!("{}/api/v1/dashboards/nonexistent", base))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body = resp.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["request_id"], "req-42");

    let resp = client
        .get(format!("{}/api/v1/topics/cobol/questions", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn dashboards_keep_declaration_order() {
    let (base, client) = spawn_server().await;
    let list = client
        .get(format!("{}/api/v1/dashboards", base))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    let ids: Vec<&str> = list["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            "dsa",
            "react",
            "data-engineering-learning",
            "algorithms",
            "system-design",
            "behavioral-interview",
            "python",
            "devops"
        ]
    );

    let data = client
        .get(format!("{}/api/v1/dashboards/data-engineering-learning", base))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(data["modules"].as_array().unwrap().len(), 12);
    assert_eq!(data["modules"][0]["icon"], json!({"kind": "component", "value": "Database"}));
}

#[tokio::test]
async fn navigation_resolves_topics_dashboards_and_modules() {
    let (base, client) = spawn_server().await;

    let topic = client
        .get(format!("{}/api/v1/navigation/resolve", base))
        .query(&[("path", "/assessments/react")])
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(topic["type"], "topic");
    assert_eq!(topic["topic"]["id"], "react");

    let dashboard = client
        .get(format!("{}/api/v1/navigation/resolve", base))
        .query(&[("path", "/react")])
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(dashboard["type"], "dashboard");
    assert_eq!(dashboard["dashboard"]["title"], "React Learning Path");

    let module = client
        .get(format!("{}/api/v1/navigation/resolve", base))
        .query(&[("path", "/data-engineering/module/3")])
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(module["type"], "dashboardModule");
    assert_eq!(module["dashboardId"], "data-engineering-learning");
    assert_eq!(module["module"]["title"], "Data Warehousing & Data Lakes");

    let missing = client
        .get(format!("{}/api/v1/navigation/resolve", base))
        .query(&[("path", "/nowhere")])
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn attempt_then_grade() {
    let (base, client) = spawn_server().await;

    let attempt = client
        .get(format!("{}/api/v1/topics/python/attempt?seed=11", base))
        .send()
        .await
        .unwrap();
    assert_eq!(attempt.status(), 200);
    let attempt = attempt.json::<serde_json::Value>().await.unwrap();
    let questions = attempt["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 30);
    assert!(questions[0].get("correctAnswer").is_none());

    let numbers: Vec<u32> = questions
        .iter()
        .map(|q| q["id"].as_str().unwrap().trim_start_matches("python-").parse().unwrap())
        .collect();
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));

    let answers: Vec<serde_json::Value> = questions
        .iter()
        .map(|q| json!({"questionId": q["id"], "answer": q["options"][0]}))
        .collect();
    let report = client
        .post(format!("{}/api/v1/topics/python/grade", base))
        .json(&json!({ "answers": answers }))
        .send()
        .await
        .unwrap();
    assert_eq!(report.status(), 200);
    let report = report.json::<serde_json::Value>().await.unwrap();
    assert_eq!(report["total"], 30);
    assert_eq!(report["answered"], 30);
    assert_eq!(report["results"].as_array().unwrap().len(), 30);

    let bad = client
        .post(format!("{}/api/v1/topics/python/grade", base))
        .json(&json!({ "answers": [{"questionId": "react-1", "answer": "x"}] }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status(), 400);

    let zero = client
        .get(format!("{}/api/v1/topics/python/attempt?size=0", base))
        .send()
        .await
        .unwrap();
    assert_eq!(zero.status(), 400);
}

#[tokio::test]
async fn omitted_questions_count_when_drawn_ids_are_sent() {
    let (base, client) = spawn_server().await;

    let attempt = client
        .get(format!("{}/api/v1/topics/python/attempt?seed=3", base))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    let ids: Vec<serde_json::Value> = attempt["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].clone())
        .collect();
    assert_eq!(ids.len(), 30);

    let report = client
        .post(format!("{}/api/v1/topics/python/grade", base))
        .json(&json!({
            "questionIds": ids,
            "answers": [{"questionId": ids[0], "answer": "not an option"}]
        }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(report["total"], 30);
    assert_eq!(report["answered"], 1);
    assert_eq!(report["correct"], 0);
    assert_eq!(report["results"][0]["questionId"], ids[0]);
}

#[tokio::test]
async fn react_learning_path_is_served() {
    let (base, client) = spawn_server().await;

    let list = client
        .get(format!("{}/api/v1/dashboards/react/topics", base))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(list["total"], 3);
    assert_eq!(list["items"][0]["id"], "hooks-fundamentals");
    assert_eq!(list["items"][0]["subtopics"][1], "useState Hook");
    assert!(list["items"][0].get("content").is_none());

    let topic = client
        .get(format!("{}/api/v1/dashboards/react/topics/state-management", base))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(topic["difficulty"], "Intermediate");
    assert_eq!(topic["subtopics"][2]["difficulty"], "Advanced");
    assert!(topic["subtopics"][0]["content"].as_str().unwrap().starts_with('#'));

    let dashboard = client
        .get(format!("{}/api/v1/dashboards/react", base))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert!(dashboard.get("learningTopics").is_none());

    let empty = client
        .get(format!("{}/api/v1/dashboards/devops/topics", base))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(empty["total"], 0);
}
