use tasklist_core::{
    KvTaskRepository, MemoryKeyValueStore, Screen, TaskCategory, TaskStore, TaskStoreError,
    ViewState,
};

fn store() -> TaskStore<KvTaskRepository<MemoryKeyValueStore>> {
    TaskStore::open(KvTaskRepository::new(MemoryKeyValueStore::new()))
}

#[test]
fn starts_on_home_with_blank_work_draft() {
    let view = ViewState::new();
    assert_eq!(view.screen(), Screen::Home);
    assert_eq!(view.draft.category, TaskCategory::Work);
    assert!(view.draft.title.is_empty());
}

#[test]
fn submit_draft_resets_form_and_shows_list() {
    let mut store = store();
    let mut view = ViewState::new();
    view.open_add();
    view.draft.title = "Pay rent".to_string();
    view.draft.category = TaskCategory::Home;

    let task = view.submit_draft(&mut store).unwrap();

    assert_eq!(task.category, TaskCategory::Home);
    assert_eq!(view.screen(), Screen::List);
    assert!(view.draft.title.is_empty());
    assert_eq!(view.draft.category, TaskCategory::Work);
}

#[test]
fn blank_draft_stays_on_add_screen() {
    let mut store = store();
    let mut view = ViewState::new();
    view.open_add();
    view.draft.description = "notes only".to_string();

    let err = view.submit_draft(&mut store).unwrap_err();
    assert!(matches!(err, TaskStoreError::Validation(_)));
    assert_eq!(view.screen(), Screen::Add);
    assert_eq!(view.draft.description, "notes only");
    assert!(store.is_empty());
}

#[test]
fn deleting_selected_task_leaves_details() {
    let mut store = store();
    let mut view = ViewState::new();
    view.draft.title = "Temporary".to_string();
    let task = view.submit_draft(&mut store).unwrap();

    view.open_details(task.id);
    assert_eq!(view.selected_task(&store).map(|t| t.id), Some(task.id));

    view.delete_task(&mut store, task.id).unwrap();
    assert_eq!(view.screen(), Screen::List);
    assert!(view.selected_task(&store).is_none());
}

#[test]
fn deleting_other_task_keeps_details_open() {
    let mut store = store();
    let mut view = ViewState::new();
    view.draft.title = "Shown".to_string();
    let shown = view.submit_draft(&mut store).unwrap();
    view.draft.title = "Other".to_string();
    let other = view.submit_draft(&mut store).unwrap();

    view.open_details(shown.id);
    view.delete_task(&mut store, other.id).unwrap();
    assert_eq!(view.screen(), Screen::Details(shown.id));
}

#[test]
fn selection_reflects_toggles_made_through_store() {
    let mut store = store();
    let mut view = ViewState::new();
    view.draft.title = "Flip me".to_string();
    let task = view.submit_draft(&mut store).unwrap();
    view.open_details(task.id);

    store.toggle_completion(task.id).unwrap();
    assert!(view.selected_task(&store).unwrap().completed);
}

#[test]
fn back_navigation_follows_screen_hierarchy() {
    let mut view = ViewState::new();
    view.open_list();
    view.open_details(tasklist_core::TaskId(9));
    view.back();
    assert_eq!(view.screen(), Screen::List);
    view.back();
    assert_eq!(view.screen(), Screen::Home);
    view.open_add();
    view.back();
    assert_eq!(view.screen(), Screen::Home);
}
