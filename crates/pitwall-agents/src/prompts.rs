//! Prompt templates sent to the generation service.

use pitwall_core::EvidenceBundle;

pub fn qa_prompt(question: &str, evidence: &EvidenceBundle) -> String {
    format!(
        "You are a concise Formula 1 race engineer.\n\
         Use the context below to answer the question.\n\
         If the context is missing key information, you may also use your own \
         general knowledge about Formula 1 to give the best possible answer.\n\
         Only say 'I don't know' if you truly cannot answer even with your own knowledge.\n\
         \n\
         Question: {question}\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Answer:",
        context = evidence.render_context(),
    )
}

pub fn general_prompt(question: &str) -> String {
    format!(
        "You are an expert on Formula 1.\n\
         Answer the user's question clearly in 2-4 sentences.\n\
         If the user asks about live data such as the exact date of the next race, \
         upcoming calendar, or anything that requires real-time information, \
         explain that you don't have access to live schedules and recommend \
         checking the official Formula 1 website or app.\n\
         \n\
         Question: {question}\n\
         \n\
         Answer:"
    )
}

pub fn sentiment_prompt(text: &str, language: Option<&str>) -> String {
    let lang_hint = language
        .filter(|l| !l.trim().is_empty())
        .map(|l| format!(" The text is in {l}."))
        .unwrap_or_default();
    format!(
        "You are a sentiment analysis engine for Formula 1 related comments, \
         team radio messages and social media posts.\n\
         Classify the overall sentiment of the given text as one of \
         'positive', 'negative', or 'neutral'.\n\
         Return the result as a STRICT JSON object with EXACTLY these keys \
         (no additional text, no Markdown, no code fences):\n\
         {{ \"label\": <string>, \"score\": <number>, \"explanation\": <string> }}\n\
         - label: 'positive' | 'negative' | 'neutral'\n\
         - score: a number between -1.0 (very negative) and 1.0 (very positive)\n\
         - explanation: one short sentence explaining why.\n\
         Do NOT wrap the JSON in ``` or any other formatting.\n\
         {lang_hint}\n\
         \n\
         Text:\n\
         {text}\n\
         \n\
         JSON:"
    )
}

pub fn summary_prompt(text: &str, max_words: usize) -> String {
    format!(
        "You are a helpful assistant summarizing Formula 1 related text \
         such as race reports, news articles, or fan discussions.\n\
         Rewrite the following text as a concise summary of at most {max_words} words.\n\
         Preserve the key events, drivers, and outcomes. \
         Use the same language as the original text.\n\
         \n\
         Original text:\n\
         {text}\n\
         \n\
         Summary:"
    )
}

pub fn evidence_summary_prompt(evidence: &str, language: &str) -> String {
    if language == "ar" {
        format!(
            "أنت محلل مختص في سباقات الفورمولا 1.\n\
             اقرأ الأدلة التالية، ثم اكتب ملخصًا قصيرًا وواضحًا باللغة العربية \
             يوضح أهم النقاط أو يجيب على سؤال المستخدم.\n\
             \n\
             الأدلة:\n\
             {evidence}\n\
             \n\
             الملخص:"
        )
    } else {
        format!(
            "You are a concise Formula 1 race analyst.\n\
             Read the evidence below and produce a short, clear summary that \
             answers the user's question or explains the situation.\n\
             \n\
             Evidence:\n\
             {evidence}\n\
             \n\
             Summary:"
        )
    }
}

pub fn multilingual_prompt(context: &str, question: &str, target_lang: &str) -> String {
    format!(
        "You are a multilingual assistant answering questions about Formula 1.\n\
         Use ONLY the context below and your general F1 knowledge when needed.\n\
         Answer the user's question in the target language: {target_lang}.\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question:\n\
         {question}\n\
         \n\
         Answer:"
    )
}
