use proptest::prelude::*;

use taskd::{
    repo::{TaskRepository, memory::MemoryRepo},
    task::{Status, TaskDraft},
    types::TaskId,
};

#[derive(Debug, Clone)]
enum Action {
    Create { status: Option<Status> },
    CreateInvalid,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => prop::option::of(prop::sample::select(Status::ALL.to_vec()))
            .prop_map(|status| Action::Create { status }),
        1 => Just(Action::CreateInvalid),
    ]
}

proptest! {
    #[test]
    fn ids_stay_dense_and_listing_matches_model(actions in prop::collection::vec(action_strategy(), 1..150)) {
        let repo = MemoryRepo::new();
        let mut model: Vec<(TaskId, Status)> = Vec::new();

        for action in actions {
            match action {
                Action::Create { status } => {
                    let draft = match status {
                        Some(s) => TaskDraft::new("t").with_status(s.as_str()),
                        None => TaskDraft::new("t"),
                    };
                    let task = repo.create(draft).expect("valid create");
                    prop_assert_eq!(task.id, model.len() as TaskId + 1);
                    model.push((task.id, status.unwrap_or(Status::New)));
                }
                Action::CreateInvalid => {
                    prop_assert!(repo.create(TaskDraft::new("t").with_status("bogus")).is_err());
                }
            }
            prop_assert_eq!(repo.last_id(), model.len() as TaskId);
        }

        let all: Vec<TaskId> = repo.list(None).expect("list").iter().map(|t| t.id).collect();
        let expected: Vec<TaskId> = model.iter().map(|(id, _)| *id).collect();
        prop_assert_eq!(all, expected);

        for status in Status::ALL {
            let got: Vec<TaskId> = repo.list(Some(status)).expect("list").iter().map(|t| t.id).collect();
            let want: Vec<TaskId> = model.iter().filter(|(_, s)| *s == status).map(|(id, _)| *id).collect();
            prop_assert_eq!(got, want);
        }
    }
}
