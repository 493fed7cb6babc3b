//! Canned productivity assistant.
//!
//! Input is lower-cased and checked
//! against [`RULES`] in order. A rule is
//! a list of keyword groups; it matches
//! when every group has at least one
//! keyword contained in the input.

#[derive(Debug, Clone, Copy)]
pub struct ChatRule {
  pub topic:    &'static str,
  pub all_of:
    &'static [&'static [&'static str]],
  pub response: &'static str
}

impl ChatRule {
  pub fn matches(
    &self,
    lowered: &str
  ) -> bool {
    self.all_of.iter().all(|group| {
      group.iter().any(|keyword| {
        lowered.contains(keyword)
      })
    })
  }
}

pub const HELP_RESPONSE: &str = "I can help you with:\n\n📅 Planning your day/week\n📝 Managing tasks\n🎯 Setting priorities\n⏰ Time management\n🚀 Beating procrastination\n💪 Staying motivated\n🎯 Setting goals\n\nTry asking: 'How do I plan my day?' or 'How do I prioritize tasks?'";

pub static RULES: &[ChatRule] = &[
  ChatRule {
    topic:    "plan-day",
    all_of:   &[&["plan"], &["day", "daily"]],
    response: "📅 To plan your day effectively:\n\n1. Start the night before - review tomorrow's tasks\n2. Identify your top 3 priorities\n3. Block time for deep work in the morning\n4. Schedule breaks every 90 minutes\n5. Leave buffer time for unexpected tasks\n6. Review and adjust at end of day"
  },
  ChatRule {
    topic:    "plan-week",
    all_of:   &[&["plan"], &["week"]],
    response: "📆 Weekly planning tips:\n\n1. Sunday/Monday: Set weekly goals\n2. Identify your big 3 tasks for the week\n3. Schedule important tasks early in the week\n4. Block time for recurring activities\n5. Plan for review on Friday\n6. Keep some flexibility for urgent matters"
  },
  ChatRule {
    topic:    "manage-tasks",
    all_of:   &[&["manage"], &["task"]],
    response: "📝 Effective task management:\n\n1. Write everything down - don't rely on memory\n2. Break large tasks into smaller steps\n3. Set clear deadlines for each task\n4. Use categories or labels to organize\n5. Review your task list daily\n6. Complete quick tasks (under 2 min) immediately\n7. Delete or delegate tasks when possible"
  },
  ChatRule {
    topic:    "organize",
    all_of:   &[&["organize", "organise"]],
    response: "🗂️ Organization tips:\n\n1. Group similar tasks together\n2. Use the Today/Tomorrow/This Week filters\n3. Set priorities: High, Medium, Low\n4. Create a 'waiting for' list for delegated tasks\n5. Keep a separate list for ideas and future tasks\n6. Clean up completed tasks weekly"
  },
  ChatRule {
    topic:    "prioritize",
    all_of:   &[&["priorit"]],
    response: "🎯 How to prioritize:\n\n1. Eisenhower Matrix:\n   - Urgent + Important = Do first\n   - Important + Not urgent = Schedule\n   - Urgent + Not important = Delegate\n   - Neither = Eliminate\n\n2. Ask: What will have the most impact?\n3. Consider deadlines and consequences\n4. Focus on 3 main tasks per day\n5. Do your hardest task first (eat the frog)"
  },
  ChatRule {
    topic:    "time-management",
    all_of:   &[&["time"], &["manage"]],
    response: "⏰ Time management strategies:\n\n1. Time blocking - assign specific times to tasks\n2. Pomodoro Technique - 25 min work, 5 min break\n3. Batch similar tasks together\n4. Minimize distractions (turn off notifications)\n5. Use the 2-minute rule for quick tasks\n6. Track where your time actually goes\n7. Learn to say 'no' to non-essential tasks"
  },
  ChatRule {
    topic:    "procrastination",
    all_of:   &[&["procrastinat"]],
    response: "🚀 Beat procrastination:\n\n1. Start with just 5 minutes\n2. Break tasks into tiny steps\n3. Remove distractions from workspace\n4. Use a timer to create urgency\n5. Reward yourself after completing tasks\n6. Understand WHY you're avoiding it\n7. Make it easier to start than to avoid"
  },
  ChatRule {
    topic:    "focus",
    all_of:   &[&["focus", "concentrate"]],
    response: "🎯 Improve focus:\n\n1. Single-tasking > Multi-tasking\n2. Use website blockers during work time\n3. Put phone in another room\n4. Work in 90-minute focused blocks\n5. Take regular breaks to recharge\n6. Create a dedicated workspace\n7. Use background music or white noise\n8. Start with your most important task"
  },
  ChatRule {
    topic:    "productivity",
    all_of:   &[&["productive", "efficiency"]],
    response: "⚡ Boost productivity:\n\n1. Plan the night before\n2. Morning routine sets the tone\n3. Tackle hardest task when energy is highest\n4. Use the 80/20 rule - focus on high-impact tasks\n5. Automate repetitive tasks\n6. Batch similar tasks\n7. Take care of yourself - sleep, exercise, nutrition\n8. Review what worked/didn't weekly"
  },
  ChatRule {
    topic:    "motivation",
    all_of:   &[&["motivat", "inspired"]],
    response: "💪 Stay motivated:\n\n1. Connect tasks to your bigger goals\n2. Visualize the end result\n3. Celebrate small wins\n4. Track your progress visually\n5. Find an accountability partner\n6. Remember your 'why'\n7. Take breaks to prevent burnout\n8. Adjust goals if they're not serving you"
  },
  ChatRule {
    topic:    "energy",
    all_of:   &[&["energy", "tired", "exhausted"]],
    response: "⚡ Manage your energy:\n\n1. Identify your peak energy times\n2. Schedule important work during high-energy periods\n3. Take real breaks - walk, stretch, hydrate\n4. Avoid back-to-back meetings\n5. Get 7-9 hours of sleep\n6. Exercise regularly\n7. Eat balanced meals\n8. Say no to energy drains"
  },
  ChatRule {
    topic:    "goals",
    all_of:   &[&["goal"]],
    response: "🎯 Set effective goals:\n\n1. Use SMART criteria:\n   - Specific\n   - Measurable\n   - Achievable\n   - Relevant\n   - Time-bound\n\n2. Break big goals into milestones\n3. Write them down and review regularly\n4. Align daily tasks with goals\n5. Track progress weekly\n6. Adjust as needed"
  },
  ChatRule {
    topic:    "habits",
    all_of:   &[&["habit"]],
    response: "🔄 Build better habits:\n\n1. Start small - 2 minutes per day\n2. Stack new habits onto existing ones\n3. Make it obvious (visual cues)\n4. Make it attractive (pair with something enjoyable)\n5. Make it easy (reduce friction)\n6. Make it satisfying (track and celebrate)\n7. Be consistent for 66 days\n8. Don't break the chain"
  },
  ChatRule {
    topic:    "stress",
    all_of:   &[&["stress", "overwhelm"]],
    response: "🧘 Manage stress:\n\n1. Brain dump - write everything down\n2. Prioritize ruthlessly\n3. Focus on what you can control\n4. Break tasks into smaller steps\n5. Take regular breaks\n6. Practice deep breathing\n7. Exercise or walk\n8. Ask for help when needed\n9. Remember: done is better than perfect"
  },
  ChatRule {
    topic:    "greeting",
    all_of:   &[&["hello", "hi", "hey"]],
    response: "Hello! 👋 I'm here to help you with:\n\n• Planning your day or week\n• Managing tasks effectively\n• Prioritizing your work\n• Time management strategies\n• Beating procrastination\n• Improving focus and productivity\n\nWhat would you like to know about?"
  },
  ChatRule {
    topic:    "thanks",
    all_of:   &[&["thank"]],
    response: "You're welcome! 😊 Feel free to ask me anything about productivity and task management anytime!"
  }
];

/// Response for free-text input using
/// the built-in rule table.
pub fn respond(input: &str) -> &'static str {
  respond_with(RULES, input)
}

pub fn respond_with(
  rules: &[ChatRule],
  input: &str
) -> &'static str {
  let lowered = input.to_lowercase();
  match rules
    .iter()
    .find(|rule| rule.matches(&lowered))
  {
    | Some(rule) => {
      tracing::debug!(
        topic = rule.topic,
        "chat rule matched"
      );
      rule.response
    }
    | None => HELP_RESPONSE
  }
}
