//! Control bridge - pose transitions in, simulation commands out
//!
//! Each fired pose maps to exactly one command and is applied synchronously.
//! Nothing is buffered: a command the game rejects (not playing, airborne) is
//! simply dropped.

use crate::classifier::Pose;
use crate::game::DinoGame;

/// The three commands the simulation accepts from the outside
pub trait GameCommands {
    fn jump(&mut self) -> bool;
    fn begin_duck(&mut self) -> bool;
    fn end_duck(&mut self) -> bool;
}

impl GameCommands for DinoGame {
    fn jump(&mut self) -> bool {
        DinoGame::jump(self)
    }

    fn begin_duck(&mut self) -> bool {
        DinoGame::begin_duck(self)
    }

    fn end_duck(&mut self) -> bool {
        DinoGame::end_duck(self)
    }
}

/// Command a pose transition stands for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Jump,
    BeginDuck,
    EndDuck,
}

impl Command {
    pub fn for_pose(pose: Pose) -> Self {
        match pose {
            Pose::Jump => Command::Jump,
            Pose::Duck => Command::BeginDuck,
            Pose::Neutral => Command::EndDuck,
        }
    }

    /// Apply to the target; returns whether the game accepted it
    pub fn apply<G: GameCommands + ?Sized>(self, target: &mut G) -> bool {
        match self {
            Command::Jump => target.jump(),
            Command::BeginDuck => target.begin_duck(),
            Command::EndDuck => target.end_duck(),
        }
    }
}

/// Forward a fired pose transition to the game
pub fn dispatch_pose<G: GameCommands + ?Sized>(pose: Pose, target: &mut G) -> bool {
    let command = Command::for_pose(pose);
    let accepted = command.apply(target);
    if !accepted {
        log::debug!("{:?} ignored by the game", command);
    }
    accepted
}
