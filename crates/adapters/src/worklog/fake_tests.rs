use super::*;
use ampa_core::work_item::builder::WorkItemBuilder;
use ampa_core::Status;

fn idea(id: &str) -> WorkItem {
    WorkItemBuilder::default().id(id).title("t").stage(Stage::Idea).build()
}

#[tokio::test]
async fn next_only_returns_delegation_eligible_stages() {
    let done = WorkItemBuilder::default().id("WL-2").title("t").stage(Stage::Done).build();
    let fake = FakeWorklog::with_items(vec![idea("WL-1"), done]);

    let candidates = fake.next(5).await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id.as_str(), "WL-1");
}

#[tokio::test]
async fn update_mutates_the_item_and_records_the_call() {
    let fake = FakeWorklog::with_items(vec![idea("WL-1")]);
    let id = WorkItemId::new("WL-1");

    fake.update(
        &id,
        WorkItemUpdate {
            status: Some(Status::InProgress),
            add_tags: vec!["delegated".to_string()],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let item = fake.item(&id).unwrap();
    assert!(item.status.is_in_progress());
    assert!(item.tags.contains(&"delegated".to_string()));
    assert_eq!(fake.calls().len(), 1);
}

#[tokio::test]
async fn add_comment_appends_and_records_the_call() {
    let fake = FakeWorklog::with_items(vec![idea("WL-1")]);
    let id = WorkItemId::new("WL-1");

    fake.add_comment(&id, "ampa", "hello").await.unwrap();

    let item = fake.item(&id).unwrap();
    assert_eq!(item.comments.len(), 1);
    assert_eq!(item.comments[0].body, "hello");
    assert_eq!(fake.calls().len(), 1);
}
