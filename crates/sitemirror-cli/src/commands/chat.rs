use anyhow::Result;
use sitemirror_application::AppContext;
use sitemirror_core::mirror::ChatMessage;

pub async fn show(context: &AppContext) -> Result<()> {
    let me = current_username(context).await;
    for message in context.chat().load().await? {
        print_message(&message, me.as_deref());
    }
    Ok(())
}

pub async fn send(context: &AppContext, message: &str) -> Result<()> {
    match context.chat().send(message).await? {
        Some(messages) => {
            let me = current_username(context).await;
            if let Some(last) = messages.last() {
                print_message(last, me.as_deref());
            }
        }
        None => println!("Nothing to send."),
    }
    Ok(())
}

/// Prints the chat on every poll until Ctrl-C.
pub async fn watch(context: &AppContext) -> Result<()> {
    let me = current_username(context).await;
    let handle = context.chat_poller().start();
    let mut feed = handle.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = feed.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = feed.borrow_and_update().clone();
                if let Some(error) = &snapshot.last_error {
                    eprintln!("{error}");
                    continue;
                }
                println!("--- {} messages ---", snapshot.messages.len());
                for message in &snapshot.messages {
                    print_message(message, me.as_deref());
                }
            }
        }
    }

    handle.stop().await;
    Ok(())
}

async fn current_username(context: &AppContext) -> Option<String> {
    context
        .account()
        .current_session()
        .await
        .map(|session| session.user.username)
}

fn print_message(message: &ChatMessage, me: Option<&str>) {
    let marker = if me.is_some_and(|name| message.is_own(name)) {
        "*"
    } else {
        " "
    };
    println!("{marker} [{}] {}: {}", message.timestamp, message.user, message.text);
}
