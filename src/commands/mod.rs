/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`             — Interactive chat session with the agent
- `eval`             — Evaluation dashboard (submit/poll jobs, summaries)
- `products`         — Catalog lookups (meta, product detail, similar)
- `special_commands` — Slash-command parser for the chat session

These handlers are intentionally small and use the library components:
the backend client, the chat session, and the job poller.
*/

pub mod chat;
pub mod eval;
pub mod products;
pub mod special_commands;
