use crate::intake::{Effect, IntakeState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: IntakeState, msg: Msg) -> (IntakeState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesDropped(candidates) => {
            let mut effects = Vec::new();
            for candidate in candidates {
                // Overflow beyond max_files is discarded silently.
                if !state.has_room() {
                    break;
                }
                let file_id = state.push_file(candidate.file, candidate.preview);
                effects.push(Effect::StartProgress { file_id });
            }
            effects
        }
        Msg::ProgressTick(file_id) => {
            state.advance_progress(file_id);
            Vec::new()
        }
        Msg::RemoveFile(file_id) => match state.remove_file(file_id) {
            Some(removed) => vec![Effect::NotifyRemoved {
                file_id,
                name: removed.file.name,
            }],
            None => Vec::new(),
        },
        Msg::PromptChanged(prompt) => {
            state.set_prompt(prompt);
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.is_loading() {
                return (state, Vec::new());
            }
            match state.files().first().map(|f| f.file.clone()) {
                Some(file) => {
                    let submission = state.begin_submission();
                    vec![Effect::RequestExplanation {
                        submission,
                        prompt: state.prompt().to_string(),
                        file,
                    }]
                }
                None => {
                    state.set_error(Some("no file selected".to_string()));
                    Vec::new()
                }
            }
        }
        Msg::ExplanationFinished {
            submission,
            outcome,
        } => {
            if submission == state.submission() && state.is_loading() {
                state.finish_submission(outcome);
            }
            Vec::new()
        }
        Msg::CloseClicked => {
            state.reset();
            Vec::new()
        }
    };

    (state, effects)
}
