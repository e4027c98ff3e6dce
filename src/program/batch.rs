//! Concurrent composition of sibling programs.

use std::fmt;
use std::sync::Arc;

use super::boxed::{AnyMsg, AnyState, BoxedProgram};
use super::dispatch::Dispatch;
use super::effect::Effect;
use super::message::Message;
use super::program::Program;
use super::subscription::Subscriptions;

/// Message of a batched program, tagged with the index of its origin.
pub struct BatchMsg {
    pub index: usize,
    pub msg: AnyMsg,
}

impl Message for BatchMsg {}

impl fmt::Debug for BatchMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchMsg")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

fn tag(index: usize) -> impl Fn(AnyMsg) -> BatchMsg + Send + Sync + 'static {
    move |msg| BatchMsg { index, msg }
}

/// Runs N programs side by side.
///
/// Each sub-program keeps its own state, reducer and subscriptions; a
/// message is routed only to the program that produced it. The combined
/// view is built by `combine` from each sub-program's view, in order.
pub struct Batch<V, W> {
    programs: Vec<BoxedProgram<V>>,
    combine: Arc<dyn Fn(Vec<V>) -> W + Send + Sync>,
}

impl<V, W> Batch<V, W> {
    pub fn new(
        programs: Vec<BoxedProgram<V>>,
        combine: impl Fn(Vec<V>) -> W + Send + Sync + 'static,
    ) -> Self {
        Self {
            programs,
            combine: Arc::new(combine),
        }
    }
}

impl<V: 'static, W: 'static> Program for Batch<V, W> {
    type State = Vec<AnyState>;
    type Msg = BatchMsg;
    type View = W;

    fn init(&self) -> (Vec<AnyState>, Effect<BatchMsg>) {
        let mut states = Vec::with_capacity(self.programs.len());
        let mut effects = Vec::with_capacity(self.programs.len());
        for (index, program) in self.programs.iter().enumerate() {
            let (state, effect) = program.init();
            states.push(state);
            effects.push(effect.map(tag(index)));
        }
        (states, Effect::batch(effects))
    }

    fn update(&self, msg: BatchMsg, mut states: Vec<AnyState>) -> (Vec<AnyState>, Effect<BatchMsg>) {
        let BatchMsg { index, msg } = msg;
        let Some(program) = self.programs.get(index).filter(|_| index < states.len()) else {
            tracing::warn!(index, "Batched message for unknown program");
            return (states, Effect::none());
        };
        let state = std::mem::replace(&mut states[index], Box::new(()));
        let (state, effect) = program.update(msg, state);
        states[index] = state;
        (states, effect.map(tag(index)))
    }

    fn subscriptions(&self, states: &Vec<AnyState>) -> Subscriptions<BatchMsg> {
        let mut subs = Subscriptions::new();
        for (index, (program, state)) in self.programs.iter().zip(states).enumerate() {
            subs.extend(
                program
                    .subscriptions(state)
                    .map(tag(index))
                    .prefixed(&format!("{index}/")),
            );
        }
        subs
    }

    fn view(&self, states: &Vec<AnyState>, dispatch: &Dispatch<BatchMsg>) -> W {
        let views = self
            .programs
            .iter()
            .zip(states)
            .enumerate()
            .map(|(index, (program, state))| program.view(state, &dispatch.map(tag(index))))
            .collect();
        (self.combine)(views)
    }

    fn name(&self) -> &'static str {
        "batch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::boxed;

    struct Counter {
        label: &'static str,
    }

    #[derive(Debug, Clone)]
    enum CounterMsg {
        Add(i64),
    }
    impl Message for CounterMsg {}

    impl Program for Counter {
        type State = i64;
        type Msg = CounterMsg;
        type View = String;

        fn init(&self) -> (i64, Effect<CounterMsg>) {
            (0, Effect::none())
        }

        fn update(&self, msg: CounterMsg, state: i64) -> (i64, Effect<CounterMsg>) {
            match msg {
                CounterMsg::Add(n) => (state + n, Effect::none()),
            }
        }

        fn view(&self, state: &i64, _dispatch: &Dispatch<CounterMsg>) -> String {
            format!("{}={}", self.label, state)
        }
    }

    fn pair() -> Batch<String, String> {
        Batch::new(
            vec![
                boxed(Counter { label: "header" }),
                boxed(Counter { label: "page" }),
            ],
            |views| views.join(" | "),
        )
    }

    #[test]
    fn messages_reach_only_their_origin() {
        let batch = pair();
        let (states, _) = batch.init();
        let msg = BatchMsg {
            index: 1,
            msg: Box::new(CounterMsg::Add(5)),
        };
        let (states, _) = batch.update(msg, states);

        let view = batch.view(&states, &Dispatch::new(|_: BatchMsg| {}));
        assert_eq!(view, "header=0 | page=5");
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let batch = pair();
        let (states, _) = batch.init();
        let msg = BatchMsg {
            index: 9,
            msg: Box::new(CounterMsg::Add(5)),
        };
        let (states, effect) = batch.update(msg, states);

        assert!(effect.is_none());
        let view = batch.view(&states, &Dispatch::new(|_: BatchMsg| {}));
        assert_eq!(view, "header=0 | page=0");
    }

    #[test]
    fn view_dispatch_tags_messages() {
        let batch = pair();
        let (states, _) = batch.init();
        let (tx, rx) = std::sync::mpsc::channel();
        let dispatch = Dispatch::new(move |msg: BatchMsg| {
            let _ = tx.send(msg.index);
        });
        let _ = batch.view(&states, &dispatch);
        dispatch.map(tag(1)).send(Box::new(CounterMsg::Add(1)));
        assert_eq!(rx.recv().ok(), Some(1));
    }
}
