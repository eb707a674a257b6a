// Draft engine core: players, the pick ledger, the contention resolver,
// and the phase state machine.

pub mod lottery;
pub mod pick;
pub mod player;
pub mod state;
