use std::time::Duration;

use chrono::{
  Datelike,
  NaiveDate
};
use tracing::{
  debug,
  warn
};

use crate::prefs::{
  PreferenceStore,
  WORD_OF_DAY_LAST_SHOWN_KEY
};

/// Delay between page load and the
/// automatic popup.
pub const AUTO_SHOW_DELAY: Duration =
  Duration::from_millis(500);
pub const AUTO_CLOSE_AFTER: Duration =
  Duration::from_secs(5);

pub static DAILY_MESSAGES: [&str; 37] = [
  "🌟 Believe in yourself and all that you are!",
  "💪 You are capable of amazing things!",
  "🎯 Success is the sum of small efforts repeated day in and day out.",
  "✨ Dream big, work hard, stay focused!",
  "🚀 The only way to do great work is to love what you do.",
  "🌈 Every accomplishment starts with the decision to try.",
  "💎 Your potential is endless. Go do what you were created to do.",
  "🔥 Don't watch the clock; do what it does. Keep going.",
  "⭐ Believe you can and you're halfway there.",
  "🌺 The future depends on what you do today.",
  "🎨 Creativity is intelligence having fun.",
  "🏆 Strive for progress, not perfection.",
  "🌸 Be yourself; everyone else is already taken.",
  "💫 Life is 10% what happens to you and 90% how you react to it.",
  "🌻 Act as if what you do makes a difference. It does.",
  "🎭 Success is not final, failure is not fatal: It is the courage to continue that counts.",
  "🌙 The best time to plant a tree was 20 years ago. The second best time is now.",
  "☀️ You miss 100% of the shots you don't take.",
  "🎪 Don't be afraid to give up the good to go for the great.",
  "🌠 I find that the harder I work, the more luck I seem to have.",
  "🎯 Success usually comes to those who are too busy to be looking for it.",
  "🌟 Opportunities don't happen. You create them.",
  "💪 Don't be pushed around by the fears in your mind. Be led by the dreams in your heart.",
  "✨ It's not whether you get knocked down, it's whether you get up.",
  "🚀 If you are working on something that you really care about, you don't have to be pushed.",
  "🌈 We may encounter many defeats but we must not be defeated.",
  "💎 Knowing is not enough; we must apply. Wishing is not enough; we must do.",
  "🔥 Imagine your life is perfect in every respect; what would it look like?",
  "⭐ We generate fears while we sit. We overcome them by action.",
  "🌺 Whether you think you can or think you can't, you're right.",
  "🎨 I have learned over the years that when one's mind is made up, this diminishes fear.",
  "🏆 Security is mostly a superstition. Life is either a daring adventure or nothing.",
  "🌸 The only person you are destined to become is the person you decide to be.",
  "💫 Go confidently in the direction of your dreams! Live the life you've imagined.",
  "🌻 Everything you've ever wanted is on the other side of fear.",
  "🎭 It does not matter how slowly you go as long as you do not stop.",
  "🌙 Too many of us are not living our dreams because we are living our fears."
];

/// Message for a calendar date, keyed
/// by its 1-based day of the year.
pub fn message_for_date(
  date: NaiveDate
) -> &'static str {
  let index = date.ordinal() as usize
    % DAILY_MESSAGES.len();
  DAILY_MESSAGES[index]
}

/// Date string stored under
/// `wordOfDayLastShown`, e.g.
/// `Sat Oct 17 2026`.
pub fn date_key(
  date: NaiveDate
) -> String {
  date.format("%a %b %d %Y").to_string()
}

/// Once-per-day gate for the automatic
/// message popup.
#[derive(Debug)]
pub struct DailyGate<P> {
  prefs: P
}

impl<P> DailyGate<P>
where
  P: PreferenceStore
{
  pub fn new(prefs: P) -> Self {
    Self { prefs }
  }

  pub fn should_show(
    &self,
    today: NaiveDate
  ) -> bool {
    let last = self
      .prefs
      .get(WORD_OF_DAY_LAST_SHOWN_KEY);
    let today_key = date_key(today);
    debug!(
      last = ?last,
      today = %today_key,
      "checking daily message gate"
    );
    last.as_deref()
      != Some(today_key.as_str())
  }

  pub fn mark_shown(
    &mut self,
    today: NaiveDate
  ) -> Result<
    (),
    crate::error::PreferenceError
  > {
    self.prefs.set(
      WORD_OF_DAY_LAST_SHOWN_KEY,
      &date_key(today)
    )
  }

  /// Today's message if it has not been
  /// shown automatically yet; records
  /// it as shown.
  pub fn take(
    &mut self,
    today: NaiveDate
  ) -> Option<&'static str> {
    if !self.should_show(today) {
      return None;
    }
    if let Err(error) =
      self.mark_shown(today)
    {
      warn!(
        %error,
        "failed to record daily \
         message as shown"
      );
    }
    Some(message_for_date(today))
  }

  pub fn into_inner(self) -> P {
    self.prefs
  }
}
