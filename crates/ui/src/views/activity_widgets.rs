//! The four exercise widgets.
//!
//! Each component renders its state machine from `vm` and feeds interaction
//! events back into it; the machines' fixed delays (mismatch clear, retry
//! re-arm, completion) are scheduled here with `tokio::time::sleep`, so a
//! torn-down view simply drops the pending task and its result.

use dioxus::prelude::*;
use dioxus_router::use_navigator;
use tokio::time::sleep;
use tracing::warn;

use services::activities::{listening, matching, ordering, speaking};
use services::{
    AnswerOutcome, ApiError, CaptureError, ListenError, MatchAttempt, OrderingCheck, SpeakError,
    SpeakingOutcome, SpeakingPhase, fetch_and_play, grade_recording,
};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{ActivityVm, AuthState, LessonVm, force_sign_out};

//
// ─── MATCHING ──────────────────────────────────────────────────────────────────
//

#[component]
pub fn MatchingWidget(vm: Signal<Option<LessonVm>>, on_complete: EventHandler<()>) -> Element {
    let entries: Vec<(String, bool, bool)> = {
        let guard = vm.read();
        match guard.as_ref().map(LessonVm::widget) {
            Some(ActivityVm::Matching(board)) => board
                .words()
                .iter()
                .map(|word| {
                    (
                        word.clone(),
                        board.is_matched(word),
                        board.is_selected(word),
                    )
                })
                .collect(),
            _ => Vec::new(),
        }
    };

    let on_word = use_callback(move |word: String| {
        let mut vm = vm;
        let attempt = {
            let mut guard = vm.write();
            let Some(lesson_vm) = guard.as_mut() else {
                return;
            };
            let ActivityVm::Matching(board) = lesson_vm.widget_mut() else {
                return;
            };
            board.select(&word)
        };
        match attempt {
            MatchAttempt::Mismatch => {
                spawn(async move {
                    sleep(matching::MISMATCH_DELAY).await;
                    let mut guard = vm.write();
                    if let Some(ActivityVm::Matching(board)) =
                        guard.as_mut().map(LessonVm::widget_mut)
                    {
                        board.clear_selection();
                    }
                });
            }
            MatchAttempt::Finished => {
                spawn(async move {
                    sleep(matching::COMPLETION_DELAY).await;
                    on_complete.call(());
                });
            }
            MatchAttempt::Selected | MatchAttempt::Matched | MatchAttempt::Ignored => {}
        }
    });

    rsx! {
        div { class: "word-bank",
            for (index, (word, matched, selected)) in entries.into_iter().enumerate() {
                WordButton {
                    key: "{index}",
                    word,
                    matched,
                    selected,
                    on_select: on_word,
                }
            }
        }
    }
}

#[component]
fn WordButton(
    word: String,
    matched: bool,
    selected: bool,
    on_select: EventHandler<String>,
) -> Element {
    let class = if matched {
        "word word--matched"
    } else if selected {
        "word word--selected"
    } else {
        "word"
    };
    let value = word.clone();

    rsx! {
        button {
            class: "{class}",
            disabled: matched,
            onclick: move |_| on_select.call(value.clone()),
            "{word}"
        }
    }
}

//
// ─── ORDERING ──────────────────────────────────────────────────────────────────
//

#[component]
pub fn OrderingWidget(vm: Signal<Option<LessonVm>>, on_complete: EventHandler<()>) -> Element {
    let mut try_again = use_signal(|| false);

    let (built, pool, can_check, solved) = {
        let guard = vm.read();
        match guard.as_ref().map(LessonVm::widget) {
            Some(ActivityVm::Ordering(board)) => (
                board.built().to_vec(),
                board.pool().to_vec(),
                board.can_check(),
                board.is_complete(),
            ),
            _ => (Vec::new(), Vec::new(), false, false),
        }
    };

    let on_unpick = use_callback(move |index: usize| {
        let mut vm = vm;
        try_again.set(false);
        let mut guard = vm.write();
        if let Some(ActivityVm::Ordering(board)) = guard.as_mut().map(LessonVm::widget_mut) {
            board.unpick(index);
        }
    });
    let on_pick = use_callback(move |index: usize| {
        let mut vm = vm;
        try_again.set(false);
        let mut guard = vm.write();
        if let Some(ActivityVm::Ordering(board)) = guard.as_mut().map(LessonVm::widget_mut) {
            board.pick(index);
        }
    });
    let on_check = use_callback(move |()| {
        let mut vm = vm;
        let verdict = {
            let mut guard = vm.write();
            match guard.as_mut().map(LessonVm::widget_mut) {
                Some(ActivityVm::Ordering(board)) => board.check(),
                _ => None,
            }
        };
        match verdict {
            Some(OrderingCheck::Correct) => {
                try_again.set(false);
                spawn(async move {
                    sleep(ordering::COMPLETION_DELAY).await;
                    on_complete.call(());
                });
            }
            Some(OrderingCheck::TryAgain) => try_again.set(true),
            None => {}
        }
    });

    rsx! {
        div { class: "word-bank word-bank--sentence",
            if built.is_empty() {
                span { class: "word-bank__placeholder", "Tap words" }
            }
            for (index, word) in built.into_iter().enumerate() {
                TokenButton { key: "{index}", index, word, on_select: on_unpick }
            }
        }
        div { class: "word-bank",
            for (index, word) in pool.into_iter().enumerate() {
                TokenButton { key: "{index}", index, word, on_select: on_pick }
            }
        }
        button {
            class: "btn btn-primary",
            disabled: !can_check,
            onclick: move |_| on_check.call(()),
            if solved { "Correct!" } else { "Check" }
        }
        if try_again() {
            p { class: "notice notice--error", "Try again!" }
        }
    }
}

#[component]
fn TokenButton(index: usize, word: String, on_select: EventHandler<usize>) -> Element {
    rsx! {
        button {
            class: "word",
            onclick: move |_| on_select.call(index),
            "{word}"
        }
    }
}

//
// ─── LISTENING ─────────────────────────────────────────────────────────────────
//

#[component]
pub fn ListeningWidget(vm: Signal<Option<LessonVm>>, on_complete: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<Signal<Option<AuthState>>>();
    let navigator = use_navigator();
    let mut notice = use_signal(|| None::<&'static str>);

    let (options, playing, selected, solved) = {
        let guard = vm.read();
        match guard.as_ref().map(LessonVm::widget) {
            Some(ActivityVm::Listening(exercise)) => (
                exercise.options().to_vec(),
                exercise.is_playing(),
                exercise.selected().map(str::to_owned),
                exercise.is_complete(),
            ),
            _ => (Vec::new(), false, None, false),
        }
    };

    let backend = ctx.backend();
    let audio = ctx.audio();
    let auth_service = ctx.auth_service();
    let on_play = use_callback(move |()| {
        let mut vm = vm;
        let text = {
            let mut guard = vm.write();
            match guard.as_mut().map(LessonVm::widget_mut) {
                Some(ActivityVm::Listening(exercise)) => exercise.begin_playback(),
                _ => None,
            }
        };
        // A tap while a request is in flight or playing is dropped here.
        let Some(text) = text else {
            return;
        };

        let backend = backend.clone();
        let audio = audio.clone();
        let auth_service = auth_service.clone();
        spawn(async move {
            let credential = auth.read().as_ref().and_then(AuthState::credential);
            let result = match credential {
                Some(credential) => {
                    fetch_and_play(backend.as_ref(), &credential, audio.as_ref(), &text).await
                }
                // Signed out mid-flow; the layout routes back to login.
                None => Ok(()),
            };
            {
                let mut guard = vm.write();
                if let Some(ActivityVm::Listening(exercise)) =
                    guard.as_mut().map(LessonVm::widget_mut)
                {
                    exercise.finish_playback();
                }
            }
            match result {
                Ok(()) => {}
                Err(ListenError::Api(ApiError::Unauthorized)) => {
                    force_sign_out(auth, &auth_service).await;
                    navigator.replace(Route::Login {});
                }
                Err(err) => {
                    warn!(error = %err, "could not fetch prompt audio");
                    notice.set(Some("Could not get audio."));
                }
            }
        });
    });

    let on_choose = use_callback(move |option: String| {
        let mut vm = vm;
        let outcome = {
            let mut guard = vm.write();
            match guard.as_mut().map(LessonVm::widget_mut) {
                Some(ActivityVm::Listening(exercise)) => exercise.choose(&option),
                _ => AnswerOutcome::Ignored,
            }
        };
        match outcome {
            AnswerOutcome::Correct => {
                notice.set(None);
                spawn(async move {
                    sleep(listening::COMPLETION_DELAY).await;
                    on_complete.call(());
                });
            }
            AnswerOutcome::Incorrect => {
                notice.set(Some("Incorrect!"));
                spawn(async move {
                    sleep(listening::RETRY_DELAY).await;
                    {
                        let mut guard = vm.write();
                        if let Some(ActivityVm::Listening(exercise)) =
                            guard.as_mut().map(LessonVm::widget_mut)
                        {
                            exercise.rearm();
                        }
                    }
                    notice.set(None);
                });
            }
            AnswerOutcome::Ignored => {}
        }
    });

    let locked = selected.is_some() || solved;

    rsx! {
        button {
            class: "sound-button",
            disabled: playing,
            onclick: move |_| on_play.call(()),
            if playing { "..." } else { "🔊" }
        }
        div { class: "choices",
            for (index, option) in options.into_iter().enumerate() {
                ChoiceButton {
                    key: "{index}",
                    option,
                    chosen: selected.as_deref() == Some(option.as_str()),
                    locked,
                    on_select: on_choose,
                }
            }
        }
        if let Some(message) = notice() {
            p { class: "notice notice--error", "{message}" }
        }
    }
}

#[component]
fn ChoiceButton(
    option: String,
    chosen: bool,
    locked: bool,
    on_select: EventHandler<String>,
) -> Element {
    let class = if chosen {
        "choice choice--selected"
    } else {
        "choice"
    };
    let value = option.clone();

    rsx! {
        button {
            class: "{class}",
            disabled: locked,
            onclick: move |_| on_select.call(value.clone()),
            "{option}"
        }
    }
}

//
// ─── SPEAKING ──────────────────────────────────────────────────────────────────
//

#[component]
pub fn SpeakingWidget(vm: Signal<Option<LessonVm>>, on_complete: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<Signal<Option<AuthState>>>();
    let navigator = use_navigator();
    let mut notice = use_signal(|| None::<&'static str>);

    let (prompt, phase) = {
        let guard = vm.read();
        match guard.as_ref().map(LessonVm::widget) {
            Some(ActivityVm::Speaking(exercise)) => {
                (exercise.prompt().to_owned(), exercise.phase().clone())
            }
            _ => (String::new(), SpeakingPhase::Idle),
        }
    };

    let backend = ctx.backend();
    let microphone = ctx.microphone();
    let auth_service = ctx.auth_service();
    let prompt_for_toggle = prompt.clone();
    let recording = matches!(phase, SpeakingPhase::Recording);
    let on_toggle = use_callback(move |()| {
        let mut vm = vm;
        if recording {
            // Recording → Processing: stop, encode, grade.
            let handle = {
                let mut guard = vm.write();
                match guard.as_mut().map(LessonVm::widget_mut) {
                    Some(ActivityVm::Speaking(exercise)) => exercise.begin_processing(),
                    _ => None,
                }
            };
            let Some(handle) = handle else {
                return;
            };
            let backend = backend.clone();
            let auth_service = auth_service.clone();
            let prompt = prompt_for_toggle.clone();
            spawn(async move {
                let credential = auth.read().as_ref().and_then(AuthState::credential);
                let Some(credential) = credential else {
                    let mut guard = vm.write();
                    if let Some(ActivityVm::Speaking(exercise)) =
                        guard.as_mut().map(LessonVm::widget_mut)
                    {
                        exercise.fail_processing();
                    }
                    return;
                };
                let result =
                    grade_recording(backend.as_ref(), &credential, handle, &prompt).await;
                match result {
                    Ok(grade) => {
                        let outcome = {
                            let mut guard = vm.write();
                            match guard.as_mut().map(LessonVm::widget_mut) {
                                Some(ActivityVm::Speaking(exercise)) => {
                                    Some(exercise.resolve(grade))
                                }
                                _ => None,
                            }
                        };
                        if outcome == Some(SpeakingOutcome::Completed) {
                            sleep(speaking::COMPLETION_DELAY).await;
                            on_complete.call(());
                        }
                    }
                    Err(err) => {
                        {
                            let mut guard = vm.write();
                            if let Some(ActivityVm::Speaking(exercise)) =
                                guard.as_mut().map(LessonVm::widget_mut)
                            {
                                exercise.fail_processing();
                            }
                        }
                        if matches!(err, SpeakError::Api(ApiError::Unauthorized)) {
                            force_sign_out(auth, &auth_service).await;
                            navigator.replace(Route::Login {});
                        } else {
                            warn!(error = %err, "could not grade the recording");
                            notice.set(Some("Could not process the recording."));
                        }
                    }
                }
            });
        } else {
            // Idle/Incorrect → Recording, behind the capability check.
            let microphone = microphone.clone();
            spawn(async move {
                match microphone.acquire().await {
                    Ok(handle) => {
                        notice.set(None);
                        let mut guard = vm.write();
                        if let Some(ActivityVm::Speaking(exercise)) =
                            guard.as_mut().map(LessonVm::widget_mut)
                        {
                            // A refused start drops the handle, releasing
                            // the capture immediately.
                            exercise.start_recording(handle);
                        }
                    }
                    Err(CaptureError::PermissionDenied) => {
                        notice.set(Some("Microphone permission is required to record."));
                    }
                    Err(err) => {
                        warn!(error = %err, "failed to start recording");
                        notice.set(Some("Failed to start recording."));
                    }
                }
            });
        }
    });

    let processing = matches!(phase, SpeakingPhase::Processing);
    let mic_class = if recording {
        "sound-button sound-button--active"
    } else {
        "sound-button"
    };
    let mic_label = if processing {
        "..."
    } else if recording {
        "⏹"
    } else {
        "🎤"
    };
    let transcribed = match &phase {
        SpeakingPhase::Correct { transcribed } => Some(transcribed.clone()),
        SpeakingPhase::Incorrect {
            transcribed: Some(text),
        } => Some(text.clone()),
        _ => None,
    };

    rsx! {
        p { class: "speaking-prompt", "\"{prompt}\"" }
        button {
            class: "{mic_class}",
            disabled: processing,
            onclick: move |_| on_toggle.call(()),
            "{mic_label}"
        }
        if let Some(text) = transcribed {
            p { class: "page__hint", "You said: \"{text}\"" }
        }
        match phase {
            SpeakingPhase::Correct { .. } => rsx! {
                p { class: "notice notice--success", "Correct!" }
            },
            SpeakingPhase::Incorrect { .. } => rsx! {
                p { class: "notice notice--error", "Not quite. Try again!" }
            },
            _ => rsx! {},
        }
        if let Some(message) = notice() {
            p { class: "notice notice--error", "{message}" }
        }
    }
}
