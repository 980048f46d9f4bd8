use bytes::Bytes;
use pretty_assertions::assert_eq;

use file_explainer::intake::{
    update, CandidateFile, Effect, FileId, IntakeState, Msg, UploadedFile,
};

fn file(name: &str, media_type: &str) -> UploadedFile {
    UploadedFile {
        name: name.to_string(),
        media_type: media_type.to_string(),
        bytes: Bytes::from(name.as_bytes().to_vec()),
    }
}

fn candidate(name: &str, media_type: &str) -> CandidateFile {
    let preview = media_type
        .starts_with("image/")
        .then(|| format!("data:{media_type};base64,AAAA"));
    CandidateFile {
        file: file(name, media_type),
        preview,
    }
}

fn drop_files(state: IntakeState, names: &[&str]) -> (IntakeState, Vec<Effect>) {
    let candidates = names
        .iter()
        .map(|name| candidate(name, "image/jpeg"))
        .collect();
    update(state, Msg::FilesDropped(candidates))
}

#[test]
fn drop_never_exceeds_max_files() {
    for max_files in 0..4 {
        let state = IntakeState::new(max_files);
        let (state, _) = drop_files(state, &["a.jpg", "b.jpg"]);
        assert!(state.files().len() <= max_files);
        let (state, effects) = drop_files(state, &["c.jpg", "d.jpg", "e.jpg"]);
        assert!(state.files().len() <= max_files);
        assert_eq!(state.files().len(), max_files.min(5));
        if state.files().len() == max_files {
            assert!(drop_files(state, &["f.jpg"]).1.is_empty());
        }
        assert!(effects.len() <= 3);
    }
}

#[test]
fn overflow_is_discarded_in_drop_order() {
    let (state, effects) = drop_files(IntakeState::new(1), &["first.jpg", "second.jpg"]);

    assert_eq!(state.files().len(), 1);
    assert_eq!(state.files()[0].file.name, "first.jpg");
    assert_eq!(
        effects,
        vec![Effect::StartProgress {
            file_id: state.files()[0].id
        }]
    );
}

#[test]
fn previews_only_for_images() {
    let state = IntakeState::new(2);
    let (state, _) = update(
        state,
        Msg::FilesDropped(vec![
            candidate("photo.png", "image/png"),
            candidate("doc.pdf", "application/pdf"),
        ]),
    );

    let view = state.view();
    assert!(view.files[0].preview.is_some());
    assert_eq!(view.files[1].preview, None);
}

#[test]
fn progress_is_monotonic_and_ends_at_100() {
    let (mut state, _) = drop_files(IntakeState::new(1), &["a.jpg"]);
    let id = state.files()[0].id;
    let mut last = 0;

    for _ in 0..30 {
        assert!(!state.files()[0].success || state.files()[0].progress == 100);
        let (next, effects) = update(state, Msg::ProgressTick(id));
        assert!(effects.is_empty());
        let progress = next.files()[0].progress;
        assert!(progress >= last);
        assert!(progress <= 100);
        last = progress;
        state = next;
    }

    assert_eq!(state.files()[0].progress, 100);
    assert!(state.files()[0].success);
    assert!(!state.is_tracking(id));
}

#[test]
fn success_set_exactly_on_reaching_100() {
    let (mut state, _) = drop_files(IntakeState::new(1), &["a.jpg"]);
    let id = state.files()[0].id;
    for _ in 0..19 {
        state = update(state, Msg::ProgressTick(id)).0;
    }
    assert_eq!(state.files()[0].progress, 95);
    assert!(!state.files()[0].success);

    state = update(state, Msg::ProgressTick(id)).0;
    assert_eq!(state.files()[0].progress, 100);
    assert!(state.files()[0].success);
}

#[test]
fn tick_for_unknown_file_is_noop() {
    let (state, _) = drop_files(IntakeState::new(1), &["a.jpg"]);
    let before = state.clone();
    let (after, effects) = update(state, Msg::ProgressTick(FileId(999)));
    assert_eq!(after, before);
    assert!(effects.is_empty());
}

#[test]
fn remove_drops_exactly_that_file() {
    let (state, _) = drop_files(IntakeState::new(3), &["a.jpg", "b.jpg", "c.jpg"]);
    let target = state.files()[1].id;

    let (state, effects) = update(state, Msg::RemoveFile(target));

    let names: Vec<&str> = state.files().iter().map(|f| f.file.name.as_str()).collect();
    assert_eq!(names, vec!["a.jpg", "c.jpg"]);
    assert_eq!(
        effects,
        vec![Effect::NotifyRemoved {
            file_id: target,
            name: "b.jpg".to_string()
        }]
    );
}

#[test]
fn removing_absent_file_is_noop() {
    let (state, _) = drop_files(IntakeState::new(2), &["a.jpg"]);
    let before = state.clone();
    let (state, effects) = update(state, Msg::RemoveFile(FileId(42)));
    assert_eq!(state, before);
    assert!(effects.is_empty());
}

#[test]
fn file_ids_are_not_reused_after_removal() {
    let (state, _) = drop_files(IntakeState::new(1), &["a.jpg"]);
    let first = state.files()[0].id;
    let (state, _) = update(state, Msg::RemoveFile(first));
    let (state, _) = drop_files(state, &["b.jpg"]);
    assert_ne!(state.files()[0].id, first);
}

#[test]
fn submit_without_files_sets_inline_error() {
    let (state, effects) = update(IntakeState::new(1), Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert!(!state.is_loading());
    assert_eq!(state.error(), Some("no file selected"));
}

#[test]
fn submit_sends_prompt_and_first_file() {
    let (state, _) = drop_files(IntakeState::new(2), &["a.jpg", "b.jpg"]);
    let (state, _) = update(state, Msg::PromptChanged("what is this?".to_string()));
    let (state, effects) = update(state, Msg::SubmitClicked);

    assert!(state.is_loading());
    assert_eq!(
        effects,
        vec![Effect::RequestExplanation {
            submission: state.submission(),
            prompt: "what is this?".to_string(),
            file: file("a.jpg", "image/jpeg"),
        }]
    );
}

#[test]
fn submit_while_loading_is_ignored() {
    let (state, _) = drop_files(IntakeState::new(1), &["a.jpg"]);
    let (state, _) = update(state, Msg::SubmitClicked);
    let submission = state.submission();
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert_eq!(state.submission(), submission);
}

#[test]
fn failed_explanation_surfaces_inline_error() {
    let (state, _) = drop_files(IntakeState::new(1), &["a.jpg"]);
    let (state, _) = update(state, Msg::SubmitClicked);
    let submission = state.submission();
    let (state, _) = update(
        state,
        Msg::ExplanationFinished {
            submission,
            outcome: Err("quota exceeded".to_string()),
        },
    );

    assert!(!state.is_loading());
    assert_eq!(state.error(), Some("quota exceeded"));
    assert_eq!(state.result(), None);
}

#[test]
fn close_resets_everything_at_once() {
    let (state, _) = drop_files(IntakeState::new(1), &["a.jpg"]);
    let (state, _) = update(state, Msg::PromptChanged("hello".to_string()));
    let (state, _) = update(state, Msg::SubmitClicked);
    let submission = state.submission();
    let (state, _) = update(
        state,
        Msg::ExplanationFinished {
            submission,
            outcome: Ok("an answer".to_string()),
        },
    );
    assert_eq!(state.result(), Some("an answer"));

    let (state, effects) = update(state, Msg::CloseClicked);
    let view = state.view();

    assert!(effects.is_empty());
    assert!(view.files.is_empty());
    assert_eq!(view.prompt, "");
    assert_eq!(view.result, None);
    assert_eq!(view.error, None);
    assert!(!view.loading);
}

#[test]
fn answer_arriving_after_close_is_dropped() {
    let (state, _) = drop_files(IntakeState::new(1), &["a.jpg"]);
    let (state, _) = update(state, Msg::SubmitClicked);
    let submission = state.submission();
    let (state, _) = update(state, Msg::CloseClicked);
    let (state, _) = update(
        state,
        Msg::ExplanationFinished {
            submission,
            outcome: Ok("late".to_string()),
        },
    );
    assert_eq!(state.result(), None);
    assert!(!state.is_loading());
}

#[test]
fn drop_then_submit_with_empty_prompt_end_to_end() {
    let state = IntakeState::new(1);
    let (state, effects) = update(
        state,
        Msg::FilesDropped(vec![candidate("holiday.jpeg", "image/jpeg")]),
    );
    assert_eq!(state.files().len(), 1);
    assert!(state.view().files[0].preview.is_some());
    assert_eq!(effects.len(), 1);

    let (state, effects) = update(state, Msg::SubmitClicked);
    let (submission, prompt) = match &effects[..] {
        [Effect::RequestExplanation {
            submission,
            prompt,
            file,
        }] => {
            assert_eq!(file.name, "holiday.jpeg");
            (*submission, prompt.clone())
        }
        other => panic!("unexpected effects: {other:?}"),
    };
    assert_eq!(prompt, "");
    assert!(state.is_loading());

    let (state, _) = update(
        state,
        Msg::ExplanationFinished {
            submission,
            outcome: Ok("A beach at sunset.".to_string()),
        },
    );
    assert_eq!(state.result(), Some("A beach at sunset."));
    assert!(!state.is_loading());
    assert_eq!(state.view().accepted_count, 1);
}
